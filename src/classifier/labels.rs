// Labels module - fixed output tables of the trained classifiers
//
// Index order matches the one-hot encoding the networks were trained with.
// `fourties` keeps the training data's spelling.

use std::fmt;

/// Age group labels by model output index
pub const AGE_LABELS: [&str; 8] = [
    "teens", "twenties", "thirties", "fourties", "fifties", "sixties", "seventies", "eighties",
];

/// Emotion labels by model output index
pub const EMOTION_LABELS: [&str; 7] = [
    "angry", "disgust", "fear", "happy", "neutral", "sad", "surprise",
];

/// Age group predicted from a voice recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeGroup {
    Teens,
    Twenties,
    Thirties,
    Fourties,
    Fifties,
    Sixties,
    Seventies,
    Eighties,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 8] = [
        AgeGroup::Teens,
        AgeGroup::Twenties,
        AgeGroup::Thirties,
        AgeGroup::Fourties,
        AgeGroup::Fifties,
        AgeGroup::Sixties,
        AgeGroup::Seventies,
        AgeGroup::Eighties,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        AGE_LABELS[self.index()]
    }

    /// Sixties and older
    pub fn is_senior(self) -> bool {
        matches!(
            self,
            AgeGroup::Sixties | AgeGroup::Seventies | AgeGroup::Eighties
        )
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emotion predicted from a voice recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmotionClass {
    Angry,
    Disgust,
    Fear,
    Happy,
    Neutral,
    Sad,
    Surprise,
}

impl EmotionClass {
    pub const ALL: [EmotionClass; 7] = [
        EmotionClass::Angry,
        EmotionClass::Disgust,
        EmotionClass::Fear,
        EmotionClass::Happy,
        EmotionClass::Neutral,
        EmotionClass::Sad,
        EmotionClass::Surprise,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        EMOTION_LABELS[self.index()]
    }
}

impl fmt::Display for EmotionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_round_trip() {
        for (index, label) in AGE_LABELS.iter().enumerate() {
            let group = AgeGroup::from_index(index).unwrap();
            assert_eq!(group.index(), index);
            assert_eq!(group.as_str(), *label);
        }
        assert_eq!(AgeGroup::from_index(8), None);
    }

    #[test]
    fn test_emotion_round_trip() {
        for (index, label) in EMOTION_LABELS.iter().enumerate() {
            let emotion = EmotionClass::from_index(index).unwrap();
            assert_eq!(emotion.index(), index);
            assert_eq!(emotion.to_string(), *label);
        }
        assert_eq!(EmotionClass::from_index(7), None);
    }

    #[test]
    fn test_senior_groups() {
        let seniors: Vec<&str> = AgeGroup::ALL
            .iter()
            .filter(|g| g.is_senior())
            .map(|g| g.as_str())
            .collect();
        assert_eq!(seniors, vec!["sixties", "seventies", "eighties"]);
    }

    #[test]
    fn test_fourties_spelling_preserved() {
        assert_eq!(AgeGroup::Fourties.to_string(), "fourties");
    }
}
