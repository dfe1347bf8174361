//! Offline demo: runs a few coaching turns through a canned generator so
//! the pipeline can be exercised without network access or an API key.

use confidence_coach::coach::ConfidenceCoach;
use confidence_coach::generate::StaticGenerator;
use confidence_coach::models::UserMessage;
use confidence_coach::quotes::StaticQuotes;
use tracing::info;

const DEMO_REPLY: &str = "\
You showed up today, and that matters.

1. Notice the progress you have already made
2. Try saying your opening line out loud once
• Your preparation counts for more than you think
- Start with the smallest piece of the task
";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("ConfidenceAI coach - offline demo");

    let mut coach = ConfidenceCoach::new(
        Box::new(StaticGenerator::new(DEMO_REPLY)),
        Box::new(StaticQuotes::new("The best way out is always through.")),
        3,
    );

    let inputs = [
        "I'm struggling to prepare for my presentation",
        "motivate me please",
        "Actually I feel great about it now",
    ];

    for input in inputs {
        let message = UserMessage::new(input)?;
        let response = coach.respond(&message).await;

        println!("\n=== TURN ===");
        println!("You:   {}", input);
        println!("Coach: {}", response.response.trim());
        println!("Confidence: {}/10", response.confidence_level);
        if !response.matched_keywords.is_empty() {
            println!("Matched: {}", response.matched_keywords.join(", "));
        }
        for (i, tip) in response.confidence_tips.iter().enumerate() {
            println!("  tip {}: {}", i + 1, tip);
        }
        for (i, step) in response.next_steps.iter().enumerate() {
            println!("  step {}: {}", i + 1, step);
        }
    }

    let summary = coach.session_summary();
    println!("\n=== SESSION ===");
    println!("Messages: {}", summary.total_messages);
    println!("Average confidence: {:.1}", summary.average_confidence);
    println!("Trend: {:?}", summary.confidence_trend);
    println!("Duration: {}", summary.session_duration);

    Ok(())
}
