//! Static profile screen data.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileStat {
  pub label: String,
  pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
  pub name: String,
  pub tagline: String,
  pub stats: Vec<ProfileStat>,
  pub settings: Vec<String>,
}

impl Default for Profile {
  fn default() -> Self {
    let stat = |label: &str, value: &str| ProfileStat { label: label.into(), value: value.into() };
    Self {
      name: "John Doe".into(),
      tagline: "Learning to drive".into(),
      stats: vec![
        stat("Tests Completed", "12"),
        stat("Average Score", "85%"),
        stat("Best Category", "Traffic Signs"),
        stat("Study Streak", "5 days"),
      ],
      settings: vec![
        "Notifications".into(),
        "Dark Mode".into(),
        "Language".into(),
        "Help & Support".into(),
      ],
    }
  }
}

/// Profile section of the TOML config; unset fields fall back to the defaults.
#[derive(Clone, Debug, Deserialize, Default)]
pub struct ProfileCfg {
  #[serde(default)] pub name: Option<String>,
  #[serde(default)] pub tagline: Option<String>,
  #[serde(default)] pub stats: Option<Vec<ProfileStat>>,
  #[serde(default)] pub settings: Option<Vec<String>>,
}

impl ProfileCfg {
  pub fn into_profile(self) -> Profile {
    let base = Profile::default();
    Profile {
      name: self.name.unwrap_or(base.name),
      tagline: self.tagline.unwrap_or(base.tagline),
      stats: self.stats.unwrap_or(base.stats),
      settings: self.settings.unwrap_or(base.settings),
    }
  }
}
