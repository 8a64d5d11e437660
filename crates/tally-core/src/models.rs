//! Data models for tally
//!
//! Defines the entities stored as flat records: user profiles, contact
//! details and schools. Each one carries its mapping table through
//! [`Entity`] so it can be loaded from and merged back into a record.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::join_strings;
use crate::schema::{self, format_bool, format_dates, Entity, FieldBinding, FieldKind, FieldValue};

/// Country assumed when a record does not name one
pub const DEFAULT_COUNTRY: &str = "United States";

/// Gender recorded on a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Gender::Unknown => "Unknown",
            Gender::Male => "Male",
            Gender::Female => "Female",
        };
        f.write_str(name)
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Unknown" => Ok(Gender::Unknown),
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(format!("Unknown gender '{}'", other)),
        }
    }
}

/// A phone number stored as a run of digits: 3 area, 3 middle, 4 last,
/// then an optional extension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phone {
    pub area_code: u32,
    pub middle_digits: u32,
    pub last_digits: u32,
    pub extension: Option<u32>,
}

impl Phone {
    /// Parse the stored digit run
    ///
    /// Each part is read only if the text is long enough for it; parts that
    /// are not numeric stay zero.
    pub fn parse(value: &str) -> Self {
        let part = |range: std::ops::Range<usize>| -> Option<u32> {
            value.get(range).and_then(|digits| digits.parse().ok())
        };

        let mut phone = Phone::default();
        if let Some(area) = part(0..3) {
            phone.area_code = area;
        }
        if let Some(middle) = part(3..6) {
            phone.middle_digits = middle;
        }
        if let Some(last) = part(6..10) {
            phone.last_digits = last;
        }
        if value.len() > 10 {
            phone.extension = value.get(10..).and_then(|digits| digits.parse().ok());
        }
        phone
    }

    pub fn is_empty(&self) -> bool {
        *self == Phone::default()
    }

    /// The digit run written back to a record
    pub fn to_record_text(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut text = format!(
            "{:03}{:03}{:04}",
            self.area_code, self.middle_digits, self.last_digits
        );
        if let Some(ext) = self.extension {
            text.push_str(&ext.to_string());
        }
        text
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:03}) {:03}-{:04}",
            self.area_code, self.middle_digits, self.last_digits
        )?;
        if let Some(ext) = self.extension {
            write!(f, " x{}", ext)?;
        }
        Ok(())
    }
}

/// Postal and online contact details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub address: String,
    pub phone: Phone,
    pub email_address: String,
    pub website: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self {
            address: String::new(),
            phone: Phone::default(),
            email_address: String::new(),
            website: String::new(),
            city: String::new(),
            state: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
            zip_code: String::new(),
        }
    }
}

/// Binding for a plain text member
macro_rules! text_binding {
    ($name:literal, $field:ident) => {
        FieldBinding {
            name: $name,
            kind: FieldKind::Text,
            read: |e: &Self| e.$field.clone(),
            write: |e: &mut Self, v: FieldValue| {
                if let FieldValue::Text(text) = v {
                    e.$field = text;
                }
            },
        }
    };
}

/// Binding for a bool member
macro_rules! bool_binding {
    ($name:literal, $field:ident) => {
        FieldBinding {
            name: $name,
            kind: FieldKind::Bool,
            read: |e: &Self| format_bool(e.$field),
            write: |e: &mut Self, v: FieldValue| {
                if let FieldValue::Bool(b) = v {
                    e.$field = b;
                }
            },
        }
    };
}

/// Binding for a `Vec<String>` member
macro_rules! list_binding {
    ($name:literal, $field:ident) => {
        FieldBinding {
            name: $name,
            kind: FieldKind::TextList,
            read: |e: &Self| join_strings(&e.$field),
            write: |e: &mut Self, v: FieldValue| {
                if let FieldValue::TextList(items) = v {
                    e.$field = items;
                }
            },
        }
    };
}

/// Binding for a `Vec<NaiveDate>` member
macro_rules! dates_binding {
    ($name:literal, $field:ident) => {
        FieldBinding {
            name: $name,
            kind: FieldKind::DateList,
            read: |e: &Self| format_dates(&e.$field),
            write: |e: &mut Self, v: FieldValue| {
                if let FieldValue::DateList(dates) = v {
                    e.$field = dates;
                }
            },
        }
    };
}

impl Entity for ContactInfo {
    fn bindings() -> Vec<FieldBinding<Self>> {
        vec![
            text_binding!("Address", address),
            FieldBinding {
                name: "Phone",
                kind: FieldKind::Phone,
                read: |c: &Self| c.phone.to_record_text(),
                write: |c: &mut Self, v: FieldValue| {
                    if let FieldValue::Phone(phone) = v {
                        c.phone = phone;
                    }
                },
            },
            text_binding!("EmailAddress", email_address),
            text_binding!("Website", website),
            text_binding!("City", city),
            text_binding!("State", state),
            text_binding!("Country", country),
            text_binding!("ZipCode", zip_code),
        ]
    }
}

/// A user profile, stored in the user's `config.txt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name; several users may share one
    pub name: String,
    /// Login name; unique across users
    pub user_name: String,
    pub password: String,
    pub motto: String,
    pub theme: String,
    pub image: String,
    pub is_teacher: bool,
    /// Folder names of the students a teacher manages
    pub students: Vec<String>,
    pub classes: Vec<String>,
    pub sick_days: Vec<NaiveDate>,
    pub field_trips: Vec<NaiveDate>,
    pub birthdate: Option<NaiveDate>,
    pub gender: Gender,
    pub search_count: i64,
    pub auto_search: bool,
    pub show_notifications: bool,
    pub enable_notification_sounds: bool,
    pub max_recent_files: i64,
    pub recent_grade_level: String,
    pub recent_course: String,
    pub assignment_location: String,
    pub contact: ContactInfo,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            user_name: String::new(),
            password: String::new(),
            motto: String::new(),
            theme: String::new(),
            image: String::new(),
            is_teacher: false,
            students: Vec::new(),
            classes: Vec::new(),
            sick_days: Vec::new(),
            field_trips: Vec::new(),
            birthdate: None,
            gender: Gender::Unknown,
            search_count: 10,
            auto_search: true,
            show_notifications: false,
            enable_notification_sounds: false,
            max_recent_files: 0,
            recent_grade_level: String::new(),
            recent_course: String::new(),
            assignment_location: String::new(),
            contact: ContactInfo::default(),
        }
    }
}

impl Entity for Profile {
    fn bindings() -> Vec<FieldBinding<Self>> {
        vec![
            text_binding!("Name", name),
            text_binding!("UserName", user_name),
            text_binding!("Password", password),
            text_binding!("Motto", motto),
            text_binding!("Theme", theme),
            text_binding!("Image", image),
            bool_binding!("IsTeacher", is_teacher),
            list_binding!("Students", students),
            list_binding!("Classes", classes),
            dates_binding!("SickDays", sick_days),
            dates_binding!("FieldTrips", field_trips),
            FieldBinding {
                name: "Birthdate",
                kind: FieldKind::Date,
                read: |p: &Self| {
                    p.birthdate
                        .map(|d| d.format(schema::DATE_FORMAT).to_string())
                        .unwrap_or_default()
                },
                write: |p: &mut Self, v: FieldValue| {
                    if let FieldValue::Date(d) = v {
                        p.birthdate = Some(d);
                    }
                },
            },
            FieldBinding {
                name: "Gender",
                kind: FieldKind::Gender,
                read: |p: &Self| p.gender.to_string(),
                write: |p: &mut Self, v: FieldValue| {
                    if let FieldValue::Gender(g) = v {
                        p.gender = g;
                    }
                },
            },
            FieldBinding {
                name: "SearchCount",
                kind: FieldKind::Int,
                read: |p: &Self| p.search_count.to_string(),
                write: |p: &mut Self, v: FieldValue| {
                    if let FieldValue::Int(n) = v {
                        p.search_count = n;
                    }
                },
            },
            bool_binding!("AutoSearch", auto_search),
            bool_binding!("ShowNotifications", show_notifications),
            bool_binding!("EnableNotificationSounds", enable_notification_sounds),
            FieldBinding {
                name: "MaxRecentFiles",
                kind: FieldKind::Int,
                read: |p: &Self| p.max_recent_files.to_string(),
                write: |p: &mut Self, v: FieldValue| {
                    if let FieldValue::Int(n) = v {
                        p.max_recent_files = n;
                    }
                },
            },
            text_binding!("RecentGradeLevel", recent_grade_level),
            text_binding!("RecentCourse", recent_course),
            text_binding!("AssignmentLocation", assignment_location),
        ]
    }
}

impl Profile {
    /// Load a profile and its contact details from one record
    pub fn from_record(document: &str) -> Self {
        let mut profile: Profile = schema::load(document);
        profile.contact = schema::load(document);
        profile
    }

    /// Write the profile and its contact details into a record
    pub fn merge_into(&self, document: &str) -> String {
        let merged = schema::merge(document, self);
        schema::merge(&merged, &self.contact)
    }

    /// Age as display text, e.g. `"12 years old"`
    ///
    /// Empty when the birthdate is unknown or the age is one year or less.
    pub fn age_label(&self, today: NaiveDate) -> String {
        let Some(birthdate) = self.birthdate else {
            return String::new();
        };
        let years = (today - birthdate).num_days() / 365;
        if years > 1 {
            format!("{} years old", years)
        } else {
            String::new()
        }
    }
}

/// A school, stored in the school folder's `config.txt`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub name: String,
    pub holidays: Vec<NaiveDate>,
    pub vacation_days: Vec<NaiveDate>,
    pub image_location: String,
    pub contact: ContactInfo,
}

impl Entity for School {
    fn bindings() -> Vec<FieldBinding<Self>> {
        vec![
            text_binding!("Name", name),
            dates_binding!("Holidays", holidays),
            dates_binding!("VacationDays", vacation_days),
            text_binding!("ImageLocation", image_location),
        ]
    }
}

impl School {
    /// Load a school and its contact details from one record
    pub fn from_record(document: &str) -> Self {
        let mut school: School = schema::load(document);
        school.contact = schema::load(document);
        school
    }

    /// True if `date` is a holiday or vacation day
    pub fn is_day_off(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date) || self.vacation_days.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::get_value;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const PROFILE_RECORD: &str = "Name = \"Ada Lovelace\"\r\n\
        UserName = \"ada\"\r\n\
        Password = \"p\\\"w\"\r\n\
        IsTeacher = \"True\"\r\n\
        Students = \"ben,cal\"\r\n\
        SickDays = \"1/15/2018 12:00:00 AM,2018-02-01\"\r\n\
        Gender = \"Female\"\r\n\
        SearchCount = \"25\"\r\n\
        AutoSearch = \"False\"\r\n\
        City = \"London\"\r\n\
        Phone = \"5551234567\"\r\n\
        Theme = \"Crystal\"\r\n";

    #[test]
    fn test_profile_from_record() {
        let profile = Profile::from_record(PROFILE_RECORD);

        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.user_name, "ada");
        assert_eq!(profile.password, "p\"w");
        assert!(profile.is_teacher);
        assert_eq!(profile.students, vec!["ben", "cal"]);
        assert_eq!(profile.sick_days, vec![date(2018, 1, 15), date(2018, 2, 1)]);
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.search_count, 25);
        assert!(!profile.auto_search);
        assert_eq!(profile.contact.city, "London");
        assert_eq!(profile.contact.country, DEFAULT_COUNTRY);
        assert_eq!(profile.contact.phone.area_code, 555);
        assert_eq!(profile.contact.phone.last_digits, 4567);
    }

    #[test]
    fn test_profile_defaults_for_empty_record() {
        let profile = Profile::from_record("");
        assert_eq!(profile, Profile::default());
        assert_eq!(profile.search_count, 10);
        assert!(profile.auto_search);
    }

    #[test]
    fn test_profile_merge_round_trip() {
        let mut profile = Profile::from_record(PROFILE_RECORD);
        profile.motto = "Compute \"all\" the things".to_string();
        profile.students.push("dee".to_string());
        profile.contact.city = "Paris".to_string();

        let record = format!("{}Validated = \"True\"\r\n", PROFILE_RECORD);
        let merged = profile.merge_into(&record);
        let reloaded = Profile::from_record(&merged);

        assert_eq!(reloaded, profile);
        // Fields outside the mapping tables survive
        assert_eq!(get_value(&merged, "Validated"), "True");
        assert_eq!(get_value(&merged, "Theme"), "Crystal");
    }

    #[test]
    fn test_phone_parse() {
        let phone = Phone::parse("55512345671234");
        assert_eq!(phone.area_code, 555);
        assert_eq!(phone.middle_digits, 123);
        assert_eq!(phone.last_digits, 4567);
        assert_eq!(phone.extension, Some(1234));
        assert_eq!(phone.to_string(), "(555) 123-4567 x1234");
        assert_eq!(phone.to_record_text(), "55512345671234");

        let partial = Phone::parse("55512");
        assert_eq!(partial.area_code, 555);
        assert_eq!(partial.middle_digits, 0);
        assert!(Phone::parse("").is_empty());
        assert!(Phone::parse("abc").is_empty());
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("Male".parse::<Gender>().unwrap(), Gender::Male);
        assert!("male".parse::<Gender>().is_err());
        assert_eq!(Gender::Female.to_string(), "Female");
    }

    #[test]
    fn test_age_label() {
        let mut profile = Profile::default();
        let today = date(2020, 6, 1);
        assert_eq!(profile.age_label(today), "");

        profile.birthdate = Some(date(2010, 1, 1));
        assert_eq!(profile.age_label(today), "10 years old");

        profile.birthdate = Some(date(2019, 1, 1));
        assert_eq!(profile.age_label(today), "");
    }

    #[test]
    fn test_school_from_record() {
        let record = "Name = \"Hill School\" Holidays = \"2018-12-25,2019-01-01\" \
                      VacationDays = \"7/4/2018\" State = \"OH\"";
        let school = School::from_record(record);

        assert_eq!(school.name, "Hill School");
        assert_eq!(school.holidays.len(), 2);
        assert!(school.is_day_off(date(2018, 7, 4)));
        assert!(school.is_day_off(date(2018, 12, 25)));
        assert!(!school.is_day_off(date(2018, 7, 5)));
        assert_eq!(school.contact.state, "OH");
    }
}
