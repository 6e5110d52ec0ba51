// Datasheet generation: form collection, prompt building, completion call.
// All completion calls go through llm_client::CompletionClient.

pub mod form;
pub mod generator;
pub mod handlers;
pub mod prompt_builder;
pub mod prompts;
