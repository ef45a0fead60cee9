use crate::error::SaveFormErrors;
use crate::models::SaveForm;

pub const COLLECTION_REQUIRED: &str = "Please enter a collection name";
pub const NAME_REQUIRED: &str = "Please enter a query name";

/// Check the save form without touching any state
pub fn validate_save_form(form: &SaveForm) -> Result<(), SaveFormErrors> {
    let mut errors = SaveFormErrors::default();

    if form.collection.trim().is_empty() {
        errors.collection = Some(COLLECTION_REQUIRED.to_string());
    }
    if form.name.trim().is_empty() {
        errors.name = Some(NAME_REQUIRED.to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
