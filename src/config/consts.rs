// src/config/consts.rs

// Portal
pub const BASE_URL: &str = "https://moms.mn.gov/";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// Output
pub const OUTPUT_FILE: &str = "moms.csv";
pub const PAGE_DUMP_FILE: &str = "page_content.html";

// Search space
pub const ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M',
    'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

pub const STATES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA",
    "HI", "ID", "IL", "IN", "IA", "KS", "KY", "LA", "ME", "MD",
    "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC",
    "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Largest result count collected without refining further.
pub const THRESHOLD: u32 = 30;
/// Name components available for refinement: first, last, middle.
pub const MAX_DEPTH: usize = 3;

pub const DATE_FROM: &str = "01/01/1900";
pub const DATE_TO: &str = "12/31/2026";

// Search form (ASP.NET WebForms ids)
pub const SEL_FIRST_NAME: &str = "input[id='ctl00_ContentPlaceHolder1_txtFirstName']";
pub const SEL_LAST_NAME: &str = "input[id='ctl00_ContentPlaceHolder1_txtLastName']";
pub const SEL_MIDDLE_NAME: &str = "input[id='ctl00_ContentPlaceHolder1_txtMiddleName']";
pub const SEL_STATE: &str = "[id='ctl00_ContentPlaceHolder1_ddlState']";
pub const SEL_DATE_FROM: &str = "input[id='ctl00_ContentPlaceHolder1_txtDateFrom']";
pub const SEL_DATE_TO: &str = "input[id='ctl00_ContentPlaceHolder1_txtDateTo']";
pub const SEL_SEARCH_BUTTON: &str = "input[id='ctl00_ContentPlaceHolder1_btnSearch']";

/// Result links on a search page.
pub const SEL_PROFILE_LINK: &str = "a[href*='Certificate']";

/// Profile page fields, in output column order. `Profile URL` is appended after these.
pub const PROFILE_FIELDS: [(&str, &str); 5] = [
    ("Applicant 1", "#applicant1"),
    ("Applicant 2", "#applicant2"),
    ("Certificate Number", "#certificate"),
    ("Date Filed", "#dateFiled"),
    ("County", "#county"),
];
pub const PROFILE_URL_FIELD: &str = "Profile URL";

// Timing (milliseconds)
pub const LANDING_TIMEOUT_MS: u64 = 60_000;
pub const LANDING_SETTLE_MS: u64 = 5_000; // challenge page
pub const FORM_TIMEOUT_MS: u64 = 60_000;
pub const SEARCH_SETTLE_MS: u64 = 1_500;
pub const PROFILE_TIMEOUT_MS: u64 = 60_000;
