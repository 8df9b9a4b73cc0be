use std::{fs, path::Path};

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::error::WayfareError;

/// What the traveller asked for.
///
/// Field names accept both `snake_case` and the `camelCase` spelling used by
/// the web form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripPreferences {
  pub destination: String,

  #[serde(alias = "startDate")]
  pub start_date: String,

  #[serde(alias = "endDate")]
  pub end_date: String,

  /// Trip length in days. The web form sends it as a string, so numeric
  /// strings are accepted too; a blank string means 0.
  #[serde(deserialize_with = "deserialize_duration")]
  pub duration: u32,

  pub interests: Vec<String>,

  pub budget: String,

  pub pace: String,

  #[serde(alias = "specialConsiderations")]
  pub special_considerations: String,
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Days {
    Number(u32),
    Text(String),
  }

  match Days::deserialize(deserializer)? {
    Days::Number(days) => Ok(days),
    Days::Text(text) if text.trim().is_empty() => Ok(0),
    Days::Text(text) => {
      text.trim().parse().map_err(|_| {
        de::Error::custom(format!("invalid trip duration: {text:?}"))
      })
    },
  }
}

impl TripPreferences {
  /// Load preferences from a TOML or JSON file.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if its
  /// extension is neither `toml` nor `json`.
  pub fn from_file(path: &Path) -> Result<Self, WayfareError> {
    let content = fs::read_to_string(path)?;
    let ext = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);

    match ext.as_deref() {
      Some("json") => Ok(serde_json::from_str(&content)?),
      Some("toml") => Ok(toml::from_str(&content)?),
      _ => Err(WayfareError::UnsupportedFormat(path.display().to_string())),
    }
  }
}

/// Build the prompt that asks the model for a day-by-day itinerary.
///
/// The requested layout (`Day X - Theme`, time-boxed parts of the day, dash
/// bullets, daily tips) is exactly what the itinerary formatter splits on.
#[must_use]
pub fn generation_prompt(prefs: &TripPreferences) -> String {
  format!(
    "Act as a travel expert and create a detailed day-by-day itinerary based \
     on the following preferences:
Destination: {destination}
Travel Dates: {start} to {end}
Duration: {duration} days
Interests: {interests}
Budget: {budget}
Pace: {pace}
Special Considerations: {special}

Please provide a detailed itinerary with the following structure for each day:

Day X - [Theme/Highlight of the Day]

Morning (Time: XX:XX - XX:XX)
- Detailed activity descriptions
- Location details and travel tips
- Estimated costs
- Recommended breakfast spots

Afternoon (Time: XX:XX - XX:XX)
- Main activities and attractions
- Location details and travel tips
- Estimated costs
- Lunch recommendations

Evening (Time: XX:XX - XX:XX)
- Evening activities and entertainment
- Location details and travel tips
- Estimated costs
- Dinner suggestions

Daily Tips:
- Transportation recommendations
- Local customs and etiquette
- Weather considerations
- Money-saving tips
Keep in mind that all currency is in INR (rupees).
Please ensure each section is clearly formatted and includes specific times, \
     locations, and practical details for PDF presentation.",
    destination = prefs.destination,
    start = prefs.start_date,
    end = prefs.end_date,
    duration = prefs.duration,
    interests = prefs.interests.join(", "),
    budget = prefs.budget,
    pace = prefs.pace,
    special = prefs.special_considerations,
  )
}

/// Build the prompt for a free-form chat question.
#[must_use]
pub fn chat_prompt(message: &str) -> String {
  format!(
    "Act as a travel assistant. Answer the following user query based on the \
     destination or trip context: {message}"
  )
}
