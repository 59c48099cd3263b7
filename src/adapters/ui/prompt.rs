//! Implements VerifierPort. Inquire prompt for the X authorization PIN.

use crate::domain::DomainError;
use crate::ports::VerifierPort;
use async_trait::async_trait;
use inquire::Text;
use inquire::validator::Validation;

/// PINs are numeric; anything else is a paste mistake.
fn validate_pin(input: &str) -> Validation {
    let pin = input.trim();
    if !pin.is_empty() && pin.chars().all(|c| c.is_ascii_digit()) {
        Validation::Valid
    } else {
        Validation::Invalid("The PIN is the number shown after authorizing the app.".into())
    }
}

/// Terminal prompt. Blocks a worker thread, not the runtime.
pub struct PinPrompt;

#[async_trait]
impl VerifierPort for PinPrompt {
    async fn verifier(&self, authorization_url: &str) -> Result<String, DomainError> {
        println!("Authorize the bot on X by visiting:\n\n  {}\n", authorization_url);
        tokio::task::spawn_blocking(|| {
            Text::new("PIN:")
                .with_help_message("Paste the PIN X displays after you authorize")
                .with_validator(|input: &str| Ok(validate_pin(input)))
                .prompt()
                .map(|pin| pin.trim().to_string())
                .map_err(|e| DomainError::Auth(e.to_string()))
        })
        .await
        .map_err(|e| DomainError::Auth(format!("PIN prompt task failed: {}", e)))?
    }
}
