//! Prompt template for tone adjustment.

/// Builds the instruction sent to the model.
pub fn tone_adjustment_prompt(text: &str, tone_description: &str) -> String {
    format!(
        "Please rewrite the following text to make it sound {tone_description}.\n\
         Maintain all the original information and meaning, but adjust the tone, word choice, and sentence structure.\n\
         Do not add any new information or explanations.\n\
         Only respond with the rewritten text, without any additional comments or explanations.\n\
         \n\
         Original text:\n\
         {text}\n"
    )
}
