use crate::client::StudyPlannerClient;
use crate::output::{self, OutputConfig};

/// Generates chapter tasks for a subject and prints them
pub async fn fetch_chapters(
    client: &StudyPlannerClient,
    subject_id: i32,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let tasks = client.fetch_chapters(subject_id).await?;
    output::print_tasks(&tasks, config);
    Ok(())
}

/// Sends one message to the study assistant and prints the reply
pub async fn chat(
    client: &StudyPlannerClient,
    message: Vec<String>,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let reply = client.chat(message.join(" ")).await?;
    output::print_chat_reply(&reply, config);
    Ok(())
}
