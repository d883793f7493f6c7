//! Runware task payload types
//!
//! Runware accepts a JSON array of tasks; the first authenticates the
//! connection and the following ones do work.

use serde::Serialize;

/// Output edge length in pixels for generated images
pub const IMAGE_SIZE: u32 = 512;

/// Images requested per inference task
pub const NUMBER_RESULTS: u32 = 1;

/// A single entry of the task array
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "taskType", rename_all = "camelCase")]
pub enum RunwareTask {
    Authentication(AuthenticationTask),
    ImageInference(ImageInferenceTask),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationTask {
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInferenceTask {
    #[serde(rename = "taskUUID")]
    pub task_uuid: String,
    pub positive_prompt: String,
    pub width: u32,
    pub height: u32,
    pub model: String,
    pub number_results: u32,
}

/// Build the two-task array for one prompt: authentication first, inference second
pub fn inference_payload(
    api_key: &str,
    task_uuid: &str,
    model: &str,
    prompt: &str,
) -> Vec<RunwareTask> {
    vec![
        RunwareTask::Authentication(AuthenticationTask {
            api_key: api_key.to_string(),
        }),
        RunwareTask::ImageInference(ImageInferenceTask {
            task_uuid: task_uuid.to_string(),
            positive_prompt: prompt.to_string(),
            width: IMAGE_SIZE,
            height: IMAGE_SIZE,
            model: model.to_string(),
            number_results: NUMBER_RESULTS,
        }),
    ]
}
