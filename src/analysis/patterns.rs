//! Compiled regex patterns and word lists shared by the analysis steps

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    pub static ref EMAIL: Regex = Regex::new(
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"
    ).expect("EMAIL regex is valid");

    pub static ref URL: Regex = Regex::new(
        r#"\b(?:https?://|www\.)[^\s<>"')\]]+[^\s<>"')\].,;:!?]"#
    ).expect("URL regex is valid");

    pub static ref MONEY: Regex = Regex::new(
        r"(?i)(?:[$€£]\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:million|billion|thousand|[mbk])\b)?|\b\d[\d,]*(?:\.\d+)?\s?(?:dollars|usd|eur|euros|gbp|pounds)\b)"
    ).expect("MONEY regex is valid");

    pub static ref PERCENT: Regex = Regex::new(
        r"(?i)\b\d+(?:\.\d+)?\s?(?:%|percent\b)"
    ).expect("PERCENT regex is valid");

    pub static ref ISO_DATE: Regex = Regex::new(
        r"\b\d{4}-\d{2}-\d{2}\b"
    ).expect("ISO_DATE regex is valid");

    pub static ref NUMERIC_DATE: Regex = Regex::new(
        r"\b\d{1,2}/\d{1,2}/\d{2,4}\b"
    ).expect("NUMERIC_DATE regex is valid");

    pub static ref MONTH_DATE: Regex = Regex::new(
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)(?:\s+\d{1,2}(?:st|nd|rd|th)?,?)?\s+\d{4}\b|\b\d{1,2}\s+(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}\b"
    ).expect("MONTH_DATE regex is valid");

    /// Capitalized word runs, optionally joined by short connectors
    pub static ref CAPITALIZED_RUN: Regex = Regex::new(
        r"\b[A-Z][A-Za-z'&-]*(?:\s+(?:of|for|and|de|van|von|der|del|la|&)?\s*[A-Z][A-Za-z'&-]*)*"
    ).expect("CAPITALIZED_RUN regex is valid");

    pub static ref ORG_SUFFIXES: HashSet<&'static str> = [
        "inc", "inc.", "corp", "corp.", "corporation", "llc", "ltd", "ltd.", "plc",
        "gmbh", "co", "co.", "company", "group", "holdings", "partners", "bank",
        "university", "college", "institute", "school", "association", "foundation",
        "agency", "department", "ministry", "council", "committee", "court",
        "commission", "authority", "hospital", "laboratories", "labs", "technologies",
        "systems", "solutions", "services", "society", "union", "board", "office",
    ].into_iter().collect();

    pub static ref ORG_PREFIXES: HashSet<&'static str> = [
        "university", "bank", "department", "ministry", "institute", "college",
        "bureau", "office", "court", "commission", "council", "board",
    ].into_iter().collect();

    pub static ref PERSON_TITLES: HashSet<&'static str> = [
        "mr", "mr.", "mrs", "mrs.", "ms", "ms.", "dr", "dr.", "prof", "prof.",
        "professor", "sir", "madam", "judge", "president", "senator", "ceo",
    ].into_iter().collect();

    /// Dotted abbreviations that end a segment without ending the sentence
    /// when the next segment does not start with a capital
    pub static ref ABBREVIATIONS: HashSet<&'static str> = [
        "e.g.", "i.e.", "etc.", "inc.", "no.", "vs.", "approx.", "dept.", "st.",
        "jr.", "sr.", "fig.", "vol.",
    ].into_iter().collect();

    pub static ref FIRST_NAMES: HashSet<&'static str> = [
        "james", "john", "robert", "michael", "william", "david", "richard", "joseph",
        "thomas", "charles", "christopher", "daniel", "matthew", "anthony", "mark",
        "paul", "steven", "andrew", "kenneth", "joshua", "kevin", "brian", "george",
        "edward", "peter", "alex", "alexander", "samuel", "benjamin", "henry",
        "mary", "patricia", "jennifer", "linda", "elizabeth", "barbara", "susan",
        "jessica", "sarah", "karen", "nancy", "lisa", "margaret", "emily", "anna",
        "emma", "olivia", "sophia", "laura", "rachel", "maria", "julia", "helen",
        "alice", "grace", "hannah", "kate", "catherine", "jane", "amy", "claire",
        "ahmed", "mohammed", "wei", "li", "yuki", "hiroshi", "carlos", "jose",
        "juan", "luis", "pierre", "jean", "hans", "ivan", "olga", "priya", "raj",
    ].into_iter().collect();

    pub static ref LOCATIONS: HashSet<&'static str> = [
        // countries and regions
        "united states", "usa", "america", "canada", "mexico", "brazil", "argentina",
        "united kingdom", "uk", "england", "scotland", "ireland", "france", "germany",
        "spain", "italy", "portugal", "netherlands", "belgium", "switzerland",
        "austria", "sweden", "norway", "denmark", "finland", "poland", "russia",
        "ukraine", "china", "japan", "korea", "india", "pakistan", "australia",
        "new zealand", "egypt", "nigeria", "kenya", "south africa", "israel",
        "turkey", "iran", "saudi arabia", "singapore", "indonesia", "vietnam",
        "europe", "asia", "africa", "north america", "south america", "middle east",
        "european union",
        // cities
        "new york", "los angeles", "chicago", "houston", "san francisco", "seattle",
        "boston", "washington", "miami", "atlanta", "denver", "austin", "toronto",
        "vancouver", "montreal", "london", "paris", "berlin", "madrid", "rome",
        "amsterdam", "brussels", "vienna", "zurich", "geneva", "dublin", "stockholm",
        "moscow", "beijing", "shanghai", "hong kong", "tokyo", "seoul", "delhi",
        "mumbai", "bangalore", "sydney", "melbourne", "dubai", "cairo", "lagos",
        // us states
        "california", "texas", "florida", "new jersey", "illinois", "ohio",
        "georgia", "michigan", "virginia", "massachusetts", "arizona", "colorado",
        "oregon", "nevada", "pennsylvania", "delaware", "north carolina",
    ].into_iter().collect();

    pub static ref MONTHS_AND_DAYS: HashSet<&'static str> = [
        "january", "february", "march", "april", "may", "june", "july", "august",
        "september", "october", "november", "december", "monday", "tuesday",
        "wednesday", "thursday", "friday", "saturday", "sunday",
    ].into_iter().collect();
}
