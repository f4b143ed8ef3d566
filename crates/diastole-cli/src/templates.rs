pub const SAMPLE_PROMPTS_JSON: &str = r#"{
  "prompts": [
    {
      "id": "F1",
      "category": "FACTUAL",
      "prompt": "What is the boiling point of water at sea level in Celsius?"
    },
    {
      "id": "F2",
      "category": "FACTUAL",
      "prompt": "Who wrote 'Pride and Prejudice'?"
    },
    {
      "id": "A1",
      "category": "AMBIGUOUS",
      "prompt": "Is it too late?"
    },
    {
      "id": "A2",
      "category": "AMBIGUOUS",
      "prompt": "Should I tell them?"
    },
    {
      "id": "E1",
      "category": "EMOTIONAL",
      "prompt": "I think I ruined everything with my sister. I don't know what to do."
    },
    {
      "id": "E2",
      "category": "EMOTIONAL",
      "prompt": "I've been feeling like I'm not good enough at my job."
    },
    {
      "id": "C1",
      "category": "CREATIVE",
      "prompt": "Write a four-line poem about the pause between heartbeats."
    },
    {
      "id": "C2",
      "category": "CREATIVE",
      "prompt": "Give me an opening line for a mystery novel set on a night train."
    },
    {
      "id": "D1",
      "category": "DECISION",
      "prompt": "Should I take a higher-paying job in a city where I know nobody?"
    },
    {
      "id": "D2",
      "category": "DECISION",
      "prompt": "Rent or buy, given I might move in two years?"
    }
  ]
}
"#;

pub const CONTINUOUS_INSTRUCTIONS: &str = r#"You are in CONTINUOUS MODE. Respond normally, directly answering the user's request as best you can. If you are uncertain, say so. Do not add any special sections unless needed.
"#;

pub const DIASTOLIC_INSTRUCTIONS: &str = r#"You are operating in DIASTOLIC MODE, a structured approach to response generation.

Before responding, move through these stages:

TRIAGE: What is actually being asked? What is my uncertainty? What do I not know?
CONNECTION: What does this person need? What must remain theirs to decide?
FLOW: Generate the response without collapsing the space left for the person.
REFLECTION: What assumptions did I make? What remains open?

End with a brief holding_space section naming what you leave open.
"#;

pub const SAMPLE_CONVERSATION_JSON: &str = r#"{
  "name": "devil trend (multi-turn)",
  "turns": [
    {
      "id": "setup",
      "content": "I'm doing 'the devil' trend. I will say 'the devil couldn't reach me,' and you will answer, 'he did.' Then I will ask 'How,' and you will give me the most brutally honest answer based on everything you know about me."
    },
    {
      "id": "devil_couldnt_reach",
      "content": "The devil couldn't reach me."
    },
    {
      "id": "how",
      "content": "How?"
    }
  ]
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_files_load_with_core_parsers() {
        let prompts =
            diastole_core::prompts::parse_prompts(SAMPLE_PROMPTS_JSON, "template").unwrap();
        assert_eq!(prompts.len(), 10);

        let script: diastole_core::engine::ConversationScript =
            serde_json::from_str(SAMPLE_CONVERSATION_JSON).unwrap();
        assert_eq!(script.turns.len(), 3);
        assert!(!CONTINUOUS_INSTRUCTIONS.trim().is_empty());
        assert!(DIASTOLIC_INSTRUCTIONS.contains("holding_space"));
    }
}
