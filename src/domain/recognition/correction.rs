use super::dto::CompletionRequest;
use chrono::NaiveDate;

const DATE_PARSER_PROMPT: &str = "You will be provided with two variables separated by commas.
The first one is a specific date and the second one is a mesure of time.
Your task is to provide the final date in format YYYY/MM/DD.
If it is not possible to calculate the date, the response is null";

const USER_CORRESPOND_PROMPT: &str = "The user has been asked if they are a certain person.
Your task is to determine if the answer is positive or negative .
If it is not posible to determine then the answer is Null.
Limit the answer to [True, False, Null].";

/// Fine-tuned models that post-process whisper transcripts, by profile name
#[derive(Debug, Clone)]
pub struct CorrectionProfiles {
    date_parser_model: String,
    user_correspond_model: String,
}

impl CorrectionProfiles {
    pub fn new(date_parser_model: String, user_correspond_model: String) -> Self {
        Self {
            date_parser_model,
            user_correspond_model,
        }
    }

    /// Build the completion for a profile, or None when the name is unknown
    pub fn request_for(&self, profile: &str, transcript: &str, today: NaiveDate) -> Option<CompletionRequest> {
        match profile {
            "date-parser" => Some(CompletionRequest {
                model: self.date_parser_model.clone(),
                temperature: 0.0,
                system_prompt: DATE_PARSER_PROMPT.to_string(),
                content: format!("{}, {}", today.format("%Y/%m/%d"), transcript),
            }),
            "user-correspond" => Some(CompletionRequest {
                model: self.user_correspond_model.clone(),
                temperature: 1.0,
                system_prompt: USER_CORRESPOND_PROMPT.to_string(),
                content: transcript.to_string(),
            }),
            _ => None,
        }
    }
}

pub fn translation_prompt(language: &str) -> String {
    format!("The input audio is in {}. Translate into english", language)
}
