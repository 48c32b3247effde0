use sqlx::FromRow;
use time::OffsetDateTime;

use crate::validation::{
    validate_instructions, validate_minutes, validate_title, ValidationError,
};

/// A persisted recipe. Always owned by exactly one user.
#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    id: i64,
    title: String,
    instructions: String,
    minutes_to_complete: i64,
    user_id: i64,
    created_at: OffsetDateTime,
}

impl Recipe {
    pub(crate) fn from_new(id: i64, new: NewRecipe, created_at: OffsetDateTime) -> Self {
        Self {
            id,
            title: new.title,
            instructions: new.instructions,
            minutes_to_complete: new.minutes_to_complete,
            user_id: new.user_id,
            created_at,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn minutes_to_complete(&self) -> i64 {
        self.minutes_to_complete
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        let title = title.into();
        validate_title(&title)?;
        self.title = title;
        Ok(())
    }

    pub fn set_instructions(
        &mut self,
        instructions: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let instructions = instructions.into();
        validate_instructions(&instructions)?;
        self.instructions = instructions;
        Ok(())
    }

    pub fn set_minutes_to_complete(&mut self, minutes: i64) -> Result<(), ValidationError> {
        validate_minutes(minutes)?;
        self.minutes_to_complete = minutes;
        Ok(())
    }
}

/// A validated recipe that has not been inserted yet.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    title: String,
    instructions: String,
    minutes_to_complete: i64,
    user_id: i64,
}

impl NewRecipe {
    /// Checks title, instructions and minutes in that order and reports the
    /// first failure.
    pub fn new(
        title: impl Into<String>,
        instructions: impl Into<String>,
        minutes_to_complete: i64,
        user_id: i64,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let instructions = instructions.into();
        validate_title(&title)?;
        validate_instructions(&instructions)?;
        validate_minutes(minutes_to_complete)?;
        Ok(Self {
            title,
            instructions,
            minutes_to_complete,
            user_id,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn minutes_to_complete(&self) -> i64 {
        self.minutes_to_complete
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTRUCTIONS: &str =
        "Whisk the eggs, fold in the flour, rest the batter for ten minutes and fry.";

    fn recipe() -> Recipe {
        let new = NewRecipe::new("Crepes", INSTRUCTIONS, 20, 7).expect("valid recipe");
        Recipe::from_new(3, new, OffsetDateTime::now_utc())
    }

    #[test]
    fn new_recipe_reports_first_invalid_field() {
        assert_eq!(
            NewRecipe::new("", "short", 0, 1).unwrap_err(),
            ValidationError::TitleMissing
        );
        assert_eq!(
            NewRecipe::new("Toast", "short", 0, 1).unwrap_err(),
            ValidationError::InstructionsTooShort
        );
        assert_eq!(
            NewRecipe::new("Toast", INSTRUCTIONS, 0, 1).unwrap_err(),
            ValidationError::MinutesNotPositive
        );
    }

    #[test]
    fn setters_validate_each_assignment() {
        let mut r = recipe();
        assert_eq!(r.set_title(""), Err(ValidationError::TitleMissing));
        assert_eq!(r.set_instructions(""), Err(ValidationError::InstructionsMissing));
        assert_eq!(
            r.set_instructions("too short"),
            Err(ValidationError::InstructionsTooShort)
        );
        assert_eq!(
            r.set_minutes_to_complete(-10),
            Err(ValidationError::MinutesNotPositive)
        );

        // rejected values leave the recipe untouched
        assert_eq!(r.title(), "Crepes");
        assert_eq!(r.instructions(), INSTRUCTIONS);
        assert_eq!(r.minutes_to_complete(), 20);

        r.set_title("Galettes").expect("title");
        r.set_minutes_to_complete(1).expect("minutes");
        assert_eq!(r.title(), "Galettes");
        assert_eq!(r.minutes_to_complete(), 1);
        assert_eq!(r.user_id(), 7);
    }
}
