use crate::types::{Score, Side};

impl Score {
    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Human => self.human += 1,
            Side::Ai => self.ai += 1,
        }
    }

    pub fn reset(&mut self) {
        *self = Score::default();
    }

    /// Who is ahead, `None` on a tie
    pub fn leader(&self) -> Option<Side> {
        match self.human.cmp(&self.ai) {
            std::cmp::Ordering::Greater => Some(Side::Human),
            std::cmp::Ordering::Less => Some(Side::Ai),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_and_reset() {
        let mut score = Score::default();
        score.increment(Side::Human);
        score.increment(Side::Ai);
        score.increment(Side::Ai);
        assert_eq!(score, Score { human: 1, ai: 2 });
        assert_eq!(score.leader(), Some(Side::Ai));

        score.reset();
        assert_eq!(score, Score::default());
        assert_eq!(score.leader(), None);
    }

    #[test]
    fn test_serializes_with_side_names() {
        let score = Score { human: 4, ai: 1 };
        let json = serde_json::to_value(&score).unwrap();
        assert_eq!(json, serde_json::json!({"Human": 4, "AI": 1}));
    }
}
