//! Generation Requests
//! The three Dify completion use-cases and their `inputs` payloads.

use serde::Serialize;
use std::fmt;

/// Which generator a request targets. Also names the output slot and API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerationKind {
    StoryAdaptation,
    PunchlineCreation,
    ComicStrip,
}

impl GenerationKind {
    pub const ALL: [GenerationKind; 3] = [
        GenerationKind::StoryAdaptation,
        GenerationKind::PunchlineCreation,
        GenerationKind::ComicStrip,
    ];

    /// Tab / settings label.
    pub fn title(self) -> &'static str {
        match self {
            GenerationKind::StoryAdaptation => "ストーリー転用",
            GenerationKind::PunchlineCreation => "オチ作成",
            GenerationKind::ComicStrip => "コマ割り作成",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            GenerationKind::StoryAdaptation => 0,
            GenerationKind::PunchlineCreation => 1,
            GenerationKind::ComicStrip => 2,
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationKind::StoryAdaptation => "story-adaptation",
            GenerationKind::PunchlineCreation => "punchline-creation",
            GenerationKind::ComicStrip => "comic-strip",
        };
        f.write_str(name)
    }
}

/// Story adaptation form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoryAdaptationInputs {
    pub original: String,
    pub theme: String,
    pub world: String,
    pub instruction: String,
}

/// Direction a punchline should take.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PunchlineDirection {
    #[default]
    #[serde(rename = "")]
    Unset,
    #[serde(rename = "誇張")]
    Exaggeration,
    #[serde(rename = "エロ")]
    Risque,
    #[serde(rename = "勘違い")]
    Misunderstanding,
}

impl PunchlineDirection {
    pub const ALL: [PunchlineDirection; 4] = [
        PunchlineDirection::Unset,
        PunchlineDirection::Exaggeration,
        PunchlineDirection::Risque,
        PunchlineDirection::Misunderstanding,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PunchlineDirection::Unset => "選択してください",
            PunchlineDirection::Exaggeration => "誇張",
            PunchlineDirection::Risque => "エロ",
            PunchlineDirection::Misunderstanding => "勘違い",
        }
    }
}

pub const MIN_RESULTS: u32 = 1;
pub const MAX_RESULTS: u32 = 10;

/// Punchline creation form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PunchlineInputs {
    pub character: String,
    pub setup: String,
    pub reaction: String,
    pub direction: PunchlineDirection,
    pub num_of_results: u32,
}

impl Default for PunchlineInputs {
    fn default() -> Self {
        Self {
            character: String::new(),
            setup: String::new(),
            reaction: String::new(),
            direction: PunchlineDirection::Unset,
            num_of_results: MIN_RESULTS,
        }
    }
}

/// Comic strip (panel layout) form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComicStripInputs {
    pub scenario: String,
}

/// A generation request, ready to dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationRequest {
    StoryAdaptation(StoryAdaptationInputs),
    PunchlineCreation(PunchlineInputs),
    ComicStrip(ComicStripInputs),
}

impl GenerationRequest {
    pub fn kind(&self) -> GenerationKind {
        match self {
            GenerationRequest::StoryAdaptation(_) => GenerationKind::StoryAdaptation,
            GenerationRequest::PunchlineCreation(_) => GenerationKind::PunchlineCreation,
            GenerationRequest::ComicStrip(_) => GenerationKind::ComicStrip,
        }
    }

    /// The `inputs` object of the completion body.
    pub fn inputs(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            GenerationRequest::StoryAdaptation(inputs) => serde_json::to_value(inputs),
            GenerationRequest::PunchlineCreation(inputs) => {
                let mut inputs = inputs.clone();
                inputs.num_of_results = inputs.num_of_results.clamp(MIN_RESULTS, MAX_RESULTS);
                serde_json::to_value(inputs)
            }
            GenerationRequest::ComicStrip(inputs) => serde_json::to_value(inputs),
        }
    }
}

/// Body of `POST /v1/completion-messages`.
#[derive(Debug, Serialize)]
pub struct CompletionBody<'a> {
    pub inputs: serde_json::Value,
    pub response_mode: &'a str,
    pub user: &'a str,
}

impl<'a> CompletionBody<'a> {
    pub fn blocking(
        request: &GenerationRequest,
        user: &'a str,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            inputs: request.inputs()?,
            response_mode: "blocking",
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn story_body_shape() {
        let request = GenerationRequest::StoryAdaptation(StoryAdaptationInputs {
            original: "桃太郎".into(),
            theme: "友情".into(),
            world: "宇宙".into(),
            instruction: String::new(),
        });
        let body = CompletionBody::blocking(&request, "user-1").unwrap();
        let body = serde_json::to_value(body).unwrap();
        assert_eq!(
            body,
            json!({
                "inputs": {
                    "original": "桃太郎",
                    "theme": "友情",
                    "world": "宇宙",
                    "instruction": ""
                },
                "response_mode": "blocking",
                "user": "user-1"
            })
        );
    }

    #[test]
    fn punchline_direction_serializes_as_label() {
        let request = GenerationRequest::PunchlineCreation(PunchlineInputs {
            character: "猫".into(),
            direction: PunchlineDirection::Misunderstanding,
            num_of_results: 3,
            ..Default::default()
        });
        assert_eq!(
            request.inputs().unwrap(),
            json!({
                "character": "猫",
                "setup": "",
                "reaction": "",
                "direction": "勘違い",
                "num_of_results": 3
            })
        );

        let unset = GenerationRequest::PunchlineCreation(PunchlineInputs::default());
        assert_eq!(unset.inputs().unwrap()["direction"], json!(""));
    }

    #[test]
    fn result_count_is_clamped() {
        let high = GenerationRequest::PunchlineCreation(PunchlineInputs {
            num_of_results: 99,
            ..Default::default()
        });
        assert_eq!(high.inputs().unwrap()["num_of_results"], json!(10));

        let low = GenerationRequest::PunchlineCreation(PunchlineInputs {
            num_of_results: 0,
            ..Default::default()
        });
        assert_eq!(low.inputs().unwrap()["num_of_results"], json!(1));
    }

    #[test]
    fn each_request_names_its_sink() {
        let comic = GenerationRequest::ComicStrip(ComicStripInputs {
            scenario: "s".into(),
        });
        assert_eq!(comic.kind(), GenerationKind::ComicStrip);
        assert_eq!(comic.inputs().unwrap(), json!({ "scenario": "s" }));
        assert_eq!(GenerationKind::ComicStrip.to_string(), "comic-strip");
        let indices: Vec<usize> = GenerationKind::ALL.iter().map(|k| k.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
