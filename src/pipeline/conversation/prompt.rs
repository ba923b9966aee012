//! Fixed assistant copy: greeting, system instruction and questionnaire
//! result summaries.

use crate::models::enums::RiskLabel;
use crate::models::PredictionResult;

/// Seeded as the first assistant turn of every session.
pub const GREETING: &str = "\u{1F916} **Xplovo - Mental Health ChatBot**\n\
Hello! I'm **Xplovo**, your friendly medical assistant. Feel free to talk to me about \
anything, whether it's related to your mental health or questions about diabetes risk.\n\
I'm here to help guide you with advice, support, and even assess your risk for diabetes. \
Just type your question, and I'll do my best to assist you!";

/// System instruction sent with every generic reply request.
pub const SYSTEM_PROMPT: &str = "You are a compassionate and supportive mental health chatbot. \
Your purpose is to help users with their mental health concerns, offering empathetic, \
non-judgmental advice. You provide coping strategies, suggest resources, and listen attentively. \
Be respectful and reassuring, but remember not to offer medical diagnoses or specific treatment plans. \
Encourage users to seek professional help if needed. \
Keep the chat in a sequence with the person, ask them more about their problem. \
Keep the answers precise.";

/// Shown next to the questionnaire when a message asks about diabetes risk.
pub const FORM_INVITATION: &str = "Sure, I can help you assess your risk of developing \
diabetes. Please answer the following questions:";

/// Assistant turn appended after a questionnaire has been scored.
pub fn assessment_summary(result: &PredictionResult) -> String {
    match result.risk_label {
        RiskLabel::AtRisk => "Based on your answers, the risk assessment indicates you may be \
            **at risk** of developing diabetes. This is not a diagnosis; please consider talking \
            to a healthcare professional about screening."
            .to_string(),
        RiskLabel::NotAtRisk => "Based on your answers, the risk assessment indicates you are \
            **not at elevated risk** of developing diabetes. It's still a good idea to monitor \
            your health regularly."
            .to_string(),
        RiskLabel::Unknown => "I couldn't complete your diabetes risk assessment right now \
            because the prediction service did not return a usable result. Your risk is \
            **unknown**; please try again later."
            .to_string(),
    }
}
