use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub earned: bool,
    #[serde(default)]
    pub earned_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementSummary {
    #[serde(default)]
    pub achievements: Vec<Achievement>,
    #[serde(default)]
    pub total_points: u32,
    #[serde(default)]
    pub earned_count: u32,
}

impl AchievementSummary {
    pub fn earned(&self) -> impl Iterator<Item = &Achievement> {
        self.achievements.iter().filter(|a| a.earned)
    }
}

/// An achievement unlocked by the progress save that reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAchievement {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub points: u32,
}

impl NewAchievement {
    /// One-line announcement, e.g. `🌱 First steps (+10)`.
    #[must_use]
    pub fn announcement(&self) -> String {
        let name = if self.icon.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.icon, self.name)
        };
        format!("{name} (+{})", self.points)
    }
}
