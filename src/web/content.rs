//! Static page content and the keyword chatbot

/// Questions asked by fraud victims, in display order
pub const FAQ: [(&str, &str); 10] = [
    (
        "1. What is credit card fraud?",
        "It's unauthorized use of a credit card to obtain funds or purchase items.",
    ),
    (
        "2. How do I know if I’ve been a victim of fraud?",
        "Unexpected charges on your card or alerts from your bank.",
    ),
    (
        "3. Can I get my money back after fraud?",
        "Yes, report it quickly and your bank can often reverse the transaction.",
    ),
    (
        "4. What’s the safest way to shop online?",
        "Use secure sites, avoid public Wi-Fi, and enable card alerts.",
    ),
    (
        "5. How does your model detect fraud?",
        "By learning patterns from historical data using 106 anonymized features.",
    ),
    (
        "6. What features are used in prediction?",
        "Behavioral and transactional features, anonymized for privacy.",
    ),
    (
        "7. Are ML models always accurate?",
        "No, they reduce risk but cannot catch 100% of fraud cases.",
    ),
    (
        "8. What should I do immediately after fraud?",
        "Block the card, notify the bank, and file a fraud report.",
    ),
    (
        "9. Can fraud happen even if my card is with me?",
        "Yes, if your card details are leaked or cloned.",
    ),
    (
        "10. Is this model used in real banks?",
        "Similar models are used by financial institutions to assist analysts.",
    ),
];

const FRAUD_REPLY: &str =
    "Fraud is unauthorized use of your credit card. It can occur online or offline.";
const PREVENT_REPLY: &str = "Use secure passwords, monitor statements, and enable SMS alerts.";
const ML_REPLY: &str =
    "ML helps identify unusual patterns and flag potentially fraudulent transactions.";
const FALLBACK_REPLY: &str = "Try asking about fraud, prevention, or how the model works!";

/// Canned answer for a chatbot question, matched on keywords in priority
/// order. Blank questions get no answer.
pub fn chatbot_reply(question: &str) -> Option<&'static str> {
    let question = question.trim().to_lowercase();
    if question.is_empty() {
        return None;
    }

    let reply = if question.contains("fraud") {
        FRAUD_REPLY
    } else if question.contains("prevent") {
        PREVENT_REPLY
    } else if question.contains("machine learning") || question.contains("ml") {
        ML_REPLY
    } else {
        FALLBACK_REPLY
    };

    Some(reply)
}

/// What the Home tab lists under "What you can do here"
pub const HOME_ACTIONS: [&str; 4] = [
    "Explore visual trends via EDA screenshots",
    "Predict fraud using smart/manual inputs or CSV",
    "Ask a chatbot about credit fraud",
    "Read FAQs asked by real fraud victims",
];

/// Sections of the project information page: (heading, paragraphs, bullets)
pub const PROJECT_INFO: [(&str, &str, &[&str]); 6] = [
    (
        "Project Overview",
        "A machine learning-powered application designed to detect potentially fraudulent \
         credit card transactions. It uses a dataset of 106 engineered features derived from \
         anonymized credit card records, scored by a logistic regression model trained to \
         distinguish between legitimate and fraudulent transactions.",
        &[],
    ),
    (
        "Purpose",
        "Fraudulent credit card transactions pose a serious threat to consumers and businesses \
         alike. This system provides:",
        &[
            "Early detection of suspicious activity",
            "Insights based on transaction behavior",
            "Easy-to-use interface for analysts, financial officers, and developers",
        ],
    ),
    (
        "Key Features",
        "",
        &[
            "EDA & Visualizations: explore the dataset and how features relate to fraud",
            "Manual & Smart Prediction: score a transaction through a short questionnaire or full feature input",
            "Chatbot Assistance: fraud-related help from a simple assistant",
            "Upload Predictions: upload a transaction file and receive fraud predictions",
        ],
    ),
    (
        "Dataset",
        "Source: Kaggle Credit Card Fraud Dataset (mishra5001/credit-card).",
        &[
            "Features: 106 anonymized variables including transaction amount, time and user behavior patterns",
            "Target: binary classification, 0 (Legitimate) and 1 (Fraudulent)",
        ],
    ),
    (
        "Model",
        "Logistic regression trained offline. The dashboard loads the exported artifact once \
         at startup and never retrains or modifies it.",
        &[],
    ),
    (
        "Smart Input Caveat",
        "The questionnaire fills only 13 of the 106 trained features and leaves the rest at \
         zero. Its scores are a demonstration, not a faithful prediction; use manual entry or \
         CSV upload for full-fidelity scoring.",
        &[],
    ),
];

/// Dataset link shown on the project information page
pub const DATASET_URL: &str = "https://www.kaggle.com/datasets/mishra5001/credit-card";
