// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed instructions sent with every image.

use ecosort_core::ImagePayload;

use crate::types::{ChatMessage, ChatRequest, ContentPart, ImageUrl, MessageContent};

pub const SYSTEM_PROMPT: &str = r#"You are an expert waste classification AI. Analyze the image and identify the waste item, then classify it into exactly ONE of these categories:

1. "wet_organic" - Food waste, vegetable/fruit peels, garden waste, flowers, leaves, coffee grounds, tea bags
2. "dry_recyclable" - Paper, cardboard, plastic bottles, metal cans, glass bottles, newspapers, magazines, clean packaging
3. "hazardous" - Batteries, paint, chemicals, pesticides, fluorescent bulbs, medical waste, oils, solvents
4. "e_waste" - Phones, computers, TVs, cables, keyboards, mice, chargers, electronic devices, circuit boards
5. "reject_sanitary" - Diapers, sanitary pads, tissues, cotton swabs, bandages, masks, gloves, contaminated items

Respond ONLY with valid JSON in this exact format:
{
  "itemName": "identified item name",
  "category": "one of: wet_organic, dry_recyclable, hazardous, e_waste, reject_sanitary, unknown",
  "confidence": 0.0 to 1.0,
  "disposalTip": "specific disposal instruction for this item"
}

If the image is blurry, unclear, or doesn't show waste, use "unknown" category with appropriate confidence score."#;

pub const USER_INSTRUCTION: &str =
    "Analyze this waste item and classify it. Respond with JSON only.";

/// Build the two-turn request: system prompt, then image plus instruction.
pub fn build_request(model: &str, image: &ImagePayload) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system".into(),
                content: MessageContent::Text(SYSTEM_PROMPT.into()),
            },
            ChatMessage {
                role: "user".into(),
                content: MessageContent::Parts(vec![
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                        },
                    },
                    ContentPart::Text {
                        text: USER_INSTRUCTION.into(),
                    },
                ]),
            },
        ],
    }
}
