use serde::{Deserialize, Serialize};

use crate::error::GradeDeskError;
use crate::model::category::{Category, CATEGORIES};

/// Percentage weight per category. Nothing here forces the weights to total 100;
/// `validate` is for callers that want to enforce it before saving.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryWeights {
    #[serde(rename = "HW", default)]
    pub homework: i32,
    #[serde(rename = "Quiz", default)]
    pub quiz: i32,
    #[serde(rename = "Midterm", default)]
    pub midterm: i32,
    #[serde(rename = "Final", default)]
    pub final_exam: i32,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            homework: 25,
            quiz: 15,
            midterm: 30,
            final_exam: 30,
        }
    }
}

impl CategoryWeights {
    pub fn new(homework: i32, quiz: i32, midterm: i32, final_exam: i32) -> Self {
        Self {
            homework,
            quiz,
            midterm,
            final_exam,
        }
    }

    pub fn get(&self, category: Category) -> i32 {
        match category {
            Category::Homework => self.homework,
            Category::Quiz => self.quiz,
            Category::Midterm => self.midterm,
            Category::Final => self.final_exam,
        }
    }

    pub fn set(&mut self, category: Category, weight: i32) {
        match category {
            Category::Homework => self.homework = weight,
            Category::Quiz => self.quiz = weight,
            Category::Midterm => self.midterm = weight,
            Category::Final => self.final_exam = weight,
        }
    }

    pub fn total(&self) -> i32 {
        CATEGORIES.iter().map(|c| self.get(*c)).sum()
    }

    pub fn validate(&self) -> Result<(), GradeDeskError> {
        for category in CATEGORIES {
            let weight = self.get(category);
            if !(0..=100).contains(&weight) {
                return Err(GradeDeskError::WeightOutOfRange { category, weight });
            }
        }
        let total = self.total();
        if total != 100 {
            return Err(GradeDeskError::WeightsDoNotSum(total));
        }
        Ok(())
    }
}
