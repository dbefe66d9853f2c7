use weatherapp_core::{DrillLevel, Error, Location, Prompt, Result, SelectionError};

/// Drill-down prompt on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn show(&mut self, level: DrillLevel, choices: &[Location]) {
        println!("Select {level}:");
        for (index, location) in choices.iter().enumerate() {
            println!("{}. {}", index + 1, location.name);
        }
    }

    fn read_line(&mut self, message: &str) -> Result<String> {
        inquire::Text::new(message).prompt().map_err(|err| Error::Prompt(err.to_string()))
    }

    fn reject(&mut self, reason: &SelectionError) {
        eprintln!("{reason}");
    }
}
