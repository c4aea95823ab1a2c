//! Interactive terminal prompts: race terms and disambiguation choices.

use dialoguer::Input;
use wikiracer_core::{CandidateChooser, Decision};
use wikiracer_shared::{Title, WikiracerError};

/// Ask for one non-empty line of text.
fn read_term(prompt: &str) -> dialoguer::Result<String> {
    Input::<String>::new().with_prompt(prompt).interact_text()
}

/// Ask for the raw start and end terms.
pub(crate) fn read_terms() -> dialoguer::Result<(String, String)> {
    let start = read_term("Starts with")?;
    let end = read_term("Ends with")?;
    Ok((start, end))
}

/// Interpret a line of user input as a decision.
pub(crate) fn parse_decision(input: &str) -> Decision {
    let input = input.trim();
    match input.parse::<i64>() {
        Ok(idx) => Decision::Pick(idx),
        Err(_) => Decision::Unrecognized(input.to_string()),
    }
}

/// Lists the candidates and asks the user for a number.
pub(crate) struct InteractiveChooser;

impl CandidateChooser for InteractiveChooser {
    fn choose(
        &mut self,
        term: &str,
        candidates: &[Title],
        attempt: u32,
    ) -> wikiracer_shared::Result<Decision> {
        let prompt = if attempt == 0 {
            println!("\nFound a few for {term}. . . Which would you like?\n");
            for (idx, candidate) in candidates.iter().enumerate() {
                println!("[{idx}]: {candidate}");
            }
            "Your choice (numerical)?"
        } else {
            "Sorry, I didn't get that. Which would you like?"
        };

        // Empty and non-numeric answers go back to the resolver as unrecognized.
        let line = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| WikiracerError::Decision(e.to_string()))?;
        Ok(parse_decision(&line))
    }
}
