use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Translation strategies offered by the streaming agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    General,
    Paraphrase,
    TwoStep,
    ThreeStep,
    Reflection,
    Cot,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::General,
        Strategy::Paraphrase,
        Strategy::TwoStep,
        Strategy::ThreeStep,
        Strategy::Reflection,
        Strategy::Cot,
    ];

    /// Wire id sent in `custom_variables.strategy`.
    pub fn id(&self) -> &'static str {
        match self {
            Strategy::General => "general",
            Strategy::Paraphrase => "paraphrase",
            Strategy::TwoStep => "two_step",
            Strategy::ThreeStep => "three_step",
            Strategy::Reflection => "reflection",
            Strategy::Cot => "cot",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::General => "Keeps the original format and balances accuracy with fluency",
            Strategy::Paraphrase => "Rewrites the content in the target language's own idiom",
            Strategy::TwoStep => "Literal translation first, then a free rewrite based on it",
            Strategy::ThreeStep => "Faithfulness, fluency, then elegance, in three passes",
            Strategy::Reflection => "Translates, critiques the draft, then revises it",
            Strategy::Cot => "Reasons about the source text before translating",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.id() == s)
            .ok_or_else(|| format!("unknown translation strategy: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_parse_back() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.id().parse::<Strategy>().unwrap(), strategy);
        }
        assert!("literal".parse::<Strategy>().is_err());
    }

    #[test]
    fn serializes_as_wire_id() {
        assert_eq!(serde_json::to_value(Strategy::ThreeStep).unwrap(), "three_step");
    }
}
