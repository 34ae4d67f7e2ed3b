//! Garden assistant reply models and scope rules

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of suggested plants kept from a model reply
pub const MAX_SUGGESTED_PLANTS: usize = 8;

/// Prompt used when the user only sends a photo
pub const DEFAULT_IMAGE_PROMPT: &str =
    "Analyze this garden or plant photo and suggest suitable plants and care steps.";

/// Horticulture vocabulary a prompt must touch to be answered
pub const SCOPE_KEYWORDS: &[&str] = &[
    "tree",
    "trees",
    "plant",
    "plants",
    "planting",
    "flower",
    "flowers",
    "seed",
    "seeds",
    "soil",
    "garden",
    "gardens",
    "gardening",
    "irrigation",
    "compost",
    "fertilizer",
    "mulch",
    "pruning",
    "nursery",
    "orchard",
    "shrub",
    "shrubs",
    "hedge",
    "greenery",
    "botany",
    "botanical",
    "horticulture",
    "watering",
    "landscaping",
    "landscape",
];

const OUT_OF_SCOPE_MESSAGE: &str = "I can only help with plants, trees, gardens and landscaping. \
Ask me about choosing species, watering, soil or garden design.";

const FALLBACK_REPLY: &str = "For a hardy, low-water garden start with drought-tolerant species, \
group plants by their water needs and mulch the soil to keep moisture in.";

const FALLBACK_SUMMARY: &str = "Drought-tolerant planting with grouped watering and mulch.";

const FALLBACK_PLANTS: [&str; 5] = [
    "Olive tree",
    "Lavender",
    "Rosemary",
    "Aloe vera",
    "Bougainvillea",
];

const FALLBACK_DESIGN_PROMPT: &str =
    "A sunny mediterranean courtyard garden with an olive tree, lavender borders and gravel mulch";

/// Structured reply expected from the language model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAiReply {
    pub in_scope: bool,
    pub reply: String,
    pub summary: String,
    pub suggested_plants: Vec<String>,
    pub design_prompt: String,
}

impl StructuredAiReply {
    /// Whether the reply asks for an illustrative design image
    pub fn wants_design_image(&self) -> bool {
        self.in_scope && !self.design_prompt.trim().is_empty()
    }
}

/// True when the prompt mentions at least one horticulture keyword
pub fn is_in_scope_prompt(prompt: &str) -> bool {
    let prompt = prompt.to_lowercase();
    SCOPE_KEYWORDS.iter().any(|keyword| prompt.contains(keyword))
}

/// Parse and normalise the raw JSON content returned by the model.
///
/// Returns `None` for empty or invalid JSON and for any missing or mistyped
/// required field.
pub fn parse_structured_reply(raw: &str) -> Option<StructuredAiReply> {
    if raw.trim().is_empty() {
        return None;
    }
    let value: Value = serde_json::from_str(raw).ok()?;
    normalize_reply_value(&value)
}

/// Same as [`parse_structured_reply`] for an already decoded JSON value
pub fn normalize_reply_value(value: &Value) -> Option<StructuredAiReply> {
    let obj = value.as_object()?;

    let in_scope = obj.get("inScope")?.as_bool()?;
    let reply = obj.get("reply")?.as_str()?.trim().to_string();
    let summary = obj.get("summary")?.as_str()?.trim().to_string();
    let design_prompt = obj.get("designPrompt")?.as_str()?.trim().to_string();
    let suggested_plants = obj
        .get("suggestedPlants")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_SUGGESTED_PLANTS)
        .map(str::to_string)
        .collect();

    Some(StructuredAiReply {
        in_scope,
        reply,
        summary,
        suggested_plants,
        design_prompt,
    })
}

/// Canned reply used whenever the model output cannot be trusted
pub fn build_fallback_reply(in_scope: bool) -> StructuredAiReply {
    if !in_scope {
        return StructuredAiReply {
            in_scope: false,
            reply: OUT_OF_SCOPE_MESSAGE.to_string(),
            ..Default::default()
        };
    }

    StructuredAiReply {
        in_scope: true,
        reply: FALLBACK_REPLY.to_string(),
        summary: FALLBACK_SUMMARY.to_string(),
        suggested_plants: FALLBACK_PLANTS.iter().map(|s| s.to_string()).collect(),
        design_prompt: FALLBACK_DESIGN_PROMPT.to_string(),
    }
}

/// Combine the keyword check with the model's own verdict.
///
/// The keyword check is a hard veto: an off-topic prompt always gets the
/// refusal, whatever the model claimed.
pub fn resolve_reply(
    prompt_in_scope: bool,
    model_reply: Option<StructuredAiReply>,
) -> StructuredAiReply {
    if !prompt_in_scope {
        return build_fallback_reply(false);
    }

    match model_reply {
        None => build_fallback_reply(true),
        Some(reply) if !reply.in_scope => build_fallback_reply(false),
        Some(reply) => reply,
    }
}
