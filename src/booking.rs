// Booking form model: controls, validation rules and the submit/reset lifecycle

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field is required")]
    Required,

    #[error("Value does not match the expected pattern")]
    Pattern,

    #[error("Invalid date, expected YYYY-MM-DD")]
    InvalidDate,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Field {0} is disabled")]
    Disabled(Field),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    Hotel,
    FirstName,
    LastName,
    Email,
    StayFrom,
    StayTo,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Hotel,
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::StayFrom,
        Field::StayTo,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Hotel => "hotel",
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::StayFrom => "stayFrom",
            Field::StayTo => "stayTo",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    Required,
    Email,
    Date,
}

impl FieldRule {
    fn check(self, value: &str) -> Result<(), ValidationError> {
        match self {
            FieldRule::Required if value.is_empty() => Err(ValidationError::Required),
            FieldRule::Required => Ok(()),
            // Empty values are left to Required
            _ if value.is_empty() => Ok(()),
            FieldRule::Email if is_email(value) => Ok(()),
            FieldRule::Email => Err(ValidationError::Pattern),
            FieldRule::Date => parse_date(value)
                .map(|_| ())
                .ok_or(ValidationError::InvalidDate),
        }
    }
}

// local@label.label[.label...]
// local: letters, digits and `._+-`; labels: letters, digits and `-`
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)+$").unwrap()
});

// Zero-padded calendar date, checked before chrono sees it
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE_PATTERN.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOn {
    Change,
    Blur,
}

#[derive(Debug, Clone)]
pub struct FormControl {
    value: String,
    pending: Option<String>,
    disabled: bool,
    update_on: UpdateOn,
    rules: Vec<FieldRule>,
    error: Option<ValidationError>,
}

impl FormControl {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        let mut control = Self {
            value: String::new(),
            pending: None,
            disabled: false,
            update_on: UpdateOn::Change,
            rules,
            error: None,
        };
        control.revalidate();
        control
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn update_on(mut self, update_on: UpdateOn) -> Self {
        self.update_on = update_on;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    pub fn valid(&self) -> bool {
        self.error.is_none()
    }

    fn set_value(&mut self, value: String) {
        self.value = value;
        self.pending = None;
        self.revalidate();
    }

    fn stage(&mut self, value: String) {
        match self.update_on {
            UpdateOn::Change => self.set_value(value),
            UpdateOn::Blur => self.pending = Some(value),
        }
    }

    fn commit(&mut self) {
        if let Some(value) = self.pending.take() {
            self.set_value(value);
        }
    }

    fn reset(&mut self) {
        self.set_value(String::new());
    }

    fn revalidate(&mut self) {
        self.error = self
            .rules
            .iter()
            .find_map(|rule| rule.check(&self.value).err());
    }
}

// Replaces the formSubmitted/showSuccess pair; success without submission cannot exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SubmissionState {
    #[default]
    Untouched,
    Invalid,
    Valid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingDetails {
    pub hotel: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub stay_from: NaiveDate,
    pub stay_to: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct BookingForm {
    controls: [FormControl; 6],
    submission: SubmissionState,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingForm {
    pub fn new() -> Self {
        Self {
            controls: [
                FormControl::new(vec![FieldRule::Required]).disabled(),
                FormControl::new(vec![FieldRule::Required]),
                FormControl::new(vec![FieldRule::Required]),
                FormControl::new(vec![FieldRule::Required, FieldRule::Email])
                    .update_on(UpdateOn::Blur),
                FormControl::new(vec![FieldRule::Required, FieldRule::Date]),
                FormControl::new(vec![FieldRule::Required, FieldRule::Date]),
            ],
            submission: SubmissionState::Untouched,
        }
    }

    pub fn control(&self, field: Field) -> &FormControl {
        &self.controls[field.index()]
    }

    fn control_mut(&mut self, field: Field) -> &mut FormControl {
        &mut self.controls[field.index()]
    }

    pub fn value(&self, field: Field) -> &str {
        self.control(field).value()
    }

    pub fn field_error(&self, field: Field) -> Option<ValidationError> {
        self.control(field).error()
    }

    // Clears every value and the submission outcome
    pub fn reset(&mut self) {
        for control in self.controls.iter_mut() {
            control.reset();
        }
        self.submission = SubmissionState::Untouched;
    }

    // Programmatic writer for the disabled hotel control
    pub fn set_hotel(&mut self, title: &str) {
        self.control_mut(Field::Hotel).set_value(title.to_string());
    }

    // User typing. Blur-updated controls only stage the value
    pub fn input(&mut self, field: Field, value: &str) -> Result<(), FieldError> {
        let control = self.control_mut(field);
        if control.is_disabled() {
            return Err(FieldError::Disabled(field));
        }
        control.stage(value.to_string());
        Ok(())
    }

    pub fn blur(&mut self, field: Field) {
        self.control_mut(field).commit();
    }

    pub fn is_valid(&self) -> bool {
        self.controls.iter().all(FormControl::valid)
    }

    pub fn submit(&mut self) -> SubmissionState {
        // Pressing submit moves focus off whatever control was being edited
        for control in self.controls.iter_mut() {
            control.commit();
        }

        self.submission = if self.is_valid() {
            SubmissionState::Valid
        } else {
            SubmissionState::Invalid
        };

        let invalid: Vec<String> = Field::ALL
            .iter()
            .filter(|field| !self.control(**field).valid())
            .map(|field| field.to_string())
            .collect();
        if invalid.is_empty() {
            info!("Booking submitted for hotel {}", self.value(Field::Hotel));
        } else {
            debug!("Booking submit rejected, invalid fields: {:?}", invalid);
        }
        self.submission
    }

    pub fn submission(&self) -> SubmissionState {
        self.submission
    }

    pub fn form_submitted(&self) -> bool {
        self.submission != SubmissionState::Untouched
    }

    pub fn show_success(&self) -> bool {
        self.submission == SubmissionState::Valid
    }

    // Inline errors appear only after a submit attempt
    pub fn show_error(&self, field: Field) -> bool {
        self.form_submitted() && !self.control(field).valid()
    }

    pub fn details(&self) -> Option<BookingDetails> {
        if !self.is_valid() {
            return None;
        }
        let date = |field| parse_date(self.value(field));
        Some(BookingDetails {
            hotel: self.value(Field::Hotel).to_string(),
            first_name: self.value(Field::FirstName).to_string(),
            last_name: self.value(Field::LastName).to_string(),
            email: self.value(Field::Email).to_string(),
            stay_from: date(Field::StayFrom)?,
            stay_to: date(Field::StayTo)?,
        })
    }
}
