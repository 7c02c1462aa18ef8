//! Canned-response driving assistant.
//!
//! Replies are picked by case-insensitive keyword matching against an ordered
//! rule list; the first rule with a matching keyword wins.

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{QuizError, Result};

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ReplyRule {
  pub keywords: Vec<String>,
  pub reply: String,
}

impl ReplyRule {
  fn new(keywords: &[&str], reply: &str) -> Self {
    Self { keywords: keywords.iter().map(|k| k.to_string()).collect(), reply: reply.into() }
  }

  fn matches(&self, lowered: &str) -> bool {
    self.keywords.iter().any(|k| lowered.contains(&k.to_lowercase()))
  }
}

#[derive(Clone, Debug)]
pub struct Assistant {
  greeting: String,
  fallback: String,
  rules: Vec<ReplyRule>,
}

impl Default for Assistant {
  fn default() -> Self {
    Self {
      greeting: "Hello! I'm your AI driving instructor. Ask me anything about traffic rules, road signs, or driving techniques!".into(),
      fallback: "That's a great question! For specific driving rules, I recommend checking your local traffic laws. Remember: always drive defensively, follow speed limits, and stay alert. Is there a specific traffic situation you'd like to know more about?".into(),
      rules: vec![
        ReplyRule::new(&["speed limit"],
          "Speed limits vary by area: 50 km/h in residential areas, 80-100 km/h on highways. Always check local signs as they may override general limits."),
        ReplyRule::new(&["stop sign"],
          "At a stop sign, you must come to a complete stop, check for traffic and pedestrians, then proceed when safe. Rolling stops are illegal."),
        ReplyRule::new(&["right of way"],
          "Right of way rules: yield to traffic already in intersection, vehicles on your right at 4-way stops, pedestrians in crosswalks, and emergency vehicles."),
        ReplyRule::new(&["parking"],
          "When parking: stay 5m from fire hydrants, don't block driveways, park in direction of traffic, and always check for parking signs and restrictions."),
        ReplyRule::new(&["yellow light"],
          "Yellow light means prepare to stop if you can do so safely. Only proceed if you're too close to stop safely without hard braking."),
        ReplyRule::new(&["merge", "highway"],
          "When merging onto highways: match the speed of traffic, use your signal, check blind spots, and merge when there's a safe gap."),
        ReplyRule::new(&["rain", "weather"],
          "In bad weather: reduce speed, increase following distance, use headlights, avoid sudden movements, and pull over if visibility is too poor."),
      ],
    }
  }
}

impl Assistant {
  /// Build from overrides; missing parts keep the built-in text.
  pub fn with_overrides(greeting: Option<String>, fallback: Option<String>, rules: Option<Vec<ReplyRule>>) -> Self {
    let base = Self::default();
    Self {
      greeting: greeting.unwrap_or(base.greeting),
      fallback: fallback.unwrap_or(base.fallback),
      rules: rules.unwrap_or(base.rules),
    }
  }

  pub fn greeting(&self) -> &str { &self.greeting }

  #[instrument(level = "debug", skip(self, text), fields(text_len = text.len()))]
  pub fn reply(&self, text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
      return Err(QuizError::EmptyMessage);
    }
    let lowered = trimmed.to_lowercase();
    match self.rules.iter().position(|r| r.matches(&lowered)) {
      Some(i) => {
        debug!(target: "assistant", rule = i, "Canned reply matched");
        Ok(self.rules[i].reply.clone())
      }
      None => {
        debug!(target: "assistant", "No rule matched; fallback reply");
        Ok(self.fallback.clone())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn matches_case_insensitively() {
    let a = Assistant::default();
    let reply = a.reply("What is the SPEED LIMIT in town?").unwrap();
    assert!(reply.starts_with("Speed limits vary"));
  }

  #[test]
  fn first_matching_rule_wins() {
    let a = Assistant::default();
    // mentions both parking and highway; parking comes first
    let reply = a.reply("parking near the highway").unwrap();
    assert!(reply.starts_with("When parking"));
  }

  #[test]
  fn any_keyword_in_group_matches() {
    let a = Assistant::default();
    assert!(a.reply("how do I merge?").unwrap().starts_with("When merging"));
    assert!(a.reply("Driving in snowy weather").unwrap().starts_with("In bad weather"));
  }

  #[test]
  fn unmatched_text_gets_fallback() {
    let a = Assistant::default();
    assert!(a.reply("tell me a joke").unwrap().starts_with("That's a great question!"));
  }

  #[test]
  fn eight_distinct_templates() {
    let a = Assistant::default();
    assert_eq!(a.rules.len() + 1, 8);
  }

  #[test]
  fn blank_message_is_rejected() {
    let a = Assistant::default();
    assert!(matches!(a.reply("   "), Err(QuizError::EmptyMessage)));
  }

  #[test]
  fn overrides_replace_only_given_parts() {
    let a = Assistant::with_overrides(
      None,
      Some("Ask your instructor.".into()),
      Some(vec![ReplyRule::new(&["Clutch"], "Press it fully.")]),
    );
    assert!(a.greeting().starts_with("Hello!"));
    assert_eq!(a.reply("clutch control").unwrap(), "Press it fully.");
    assert_eq!(a.reply("speed limit").unwrap(), "Ask your instructor.");
  }
}
