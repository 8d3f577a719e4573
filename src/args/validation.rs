use serde_json::Value;
use std::{fs, path::PathBuf};

/// # Errors
///
/// Will return `Err` if the file is not readable
pub fn check_readable_file(file: &str) -> Result<String, String> {
    // split by semi-colon
    let files = file.split(';');
    for file in files {
        let path = PathBuf::from(file);
        if !path.is_file() || fs::metadata(&path).is_err() {
            return Err(format!("The sql startup script '{file}' is not readable."));
        }
    }
    Ok(file.to_string())
}

/// # Errors
///
/// Will return `Err` if the file is not readable or is not valid json
pub fn check_readable_file_and_json(file: &str) -> Result<Value, String> {
    let path = PathBuf::from(file);
    if !path.is_file() || fs::metadata(&path).is_err() {
        return Err(format!("The json file '{file}' is not readable."));
    }
    let contents =
        fs::read_to_string(&path).map_err(|e| format!("Could not read '{file}': {e}"))?;
    let json: Value =
        serde_json::from_str(&contents).map_err(|e| format!("'{file}' is not valid json: {e}"))?;
    validate_json_format(&json)?;
    Ok(json)
}

/// Validate the json file format
/// format we expect is this:
/// [{ "event": <int>, "name": "value", "start_time": "YYYY-MM-DDTHH:MM:SS",
///    "interval_minutes": <int>, "allowance_percent": <int>
/// , "tees": [{"sex": "male"|"female", "tee_color": "value", "par": <int>, "course_rating": <float>, "slope_rating": <int>}, ...]
/// , "data_to_fill_if_event_missing": [
///   { "members": [{"name": "Firstname Lastname", "handicap_index": <float>, "sex": "male"|"female"}, ...]
///   , "guests": [{"name": "Firstname Lastname", "handicap_index": <float>, "sex": "male"|"female", "included": <bool>}, ...]
///   , "event_members": ["Firstname Lastname", ...]
/// }]}]
///
/// # Errors
///
/// Will return `Err` if the json is not in the correct format
fn validate_json_format(json: &Value) -> Result<(), String> {
    let Some(events) = json.as_array() else {
        return Err("The json file is not in the correct format.".to_string());
    };

    let expected_keys = vec![
        "event",
        "name",
        "start_time",
        "interval_minutes",
        "allowance_percent",
        "tees",
        "data_to_fill_if_event_missing",
    ];
    for element in events {
        let Some(obj) = element.as_object() else {
            return Err("The json file is not in the correct format.".to_string());
        };
        for key in obj.keys() {
            if !expected_keys.contains(&key.as_str()) {
                return Err(format!(
                    "The json file is not in the correct format. Expected keys: {expected_keys:?}"
                ));
            }
        }
        if !element["event"].is_number() {
            return Err(
                "The json key event is not in the correct format. Expected a number.".to_string(),
            );
        }
        if !element["name"].is_string() {
            return Err(
                "The json key name is not in the correct format. Expected a string.".to_string(),
            );
        }
        if !element["start_time"].is_string() {
            return Err(
                "The json key start_time is not in the correct format. Expected a string."
                    .to_string(),
            );
        }
        if !element["interval_minutes"].is_number() {
            return Err(
                "The json key interval_minutes is not in the correct format. Expected a number."
                    .to_string(),
            );
        }

        for tee in element["tees"].as_array().map_or(&[][..], Vec::as_slice) {
            if !tee.is_object() {
                return Err(
                    "The json key tees is not in the correct format. Expected objects."
                        .to_string(),
                );
            }
            let sex_ok = matches!(tee["sex"].as_str(), Some("male" | "female"));
            if !sex_ok
                || !tee["tee_color"].is_string()
                || !tee["par"].is_number()
                || !tee["course_rating"].is_number()
                || !tee["slope_rating"].is_number()
            {
                return Err(
                    "The json key tees is not in the correct format. Expected objects with keys sex, tee_color, par, course_rating and slope_rating.".to_string()
                );
            }
        }

        let Some(data_to_fill) = element["data_to_fill_if_event_missing"].as_array() else {
            continue;
        };
        for data in data_to_fill {
            let expected_keys = vec!["members", "guests", "event_members"];
            let Some(data_obj) = data.as_object() else {
                return Err(
                    "The json key data_to_fill_if_event_missing is not in the correct format."
                        .to_string(),
                );
            };
            for (key, _) in data_obj {
                if !expected_keys.contains(&key.as_str()) {
                    return Err(format!(
                        "The json key data_to_fill_if_event_missing is not in the correct format. Expected keys: {expected_keys:?}"
                    ));
                }
            }

            for member in data["members"].as_array().map_or(&[][..], Vec::as_slice) {
                if !member.is_object() || !member["name"].is_string() {
                    return Err(
                        "The json key members is not in the correct format. Expected objects with a name key.".to_string()
                    );
                }
            }
            for guest in data["guests"].as_array().map_or(&[][..], Vec::as_slice) {
                if !guest.is_object() || !guest["name"].is_string() {
                    return Err(
                        "The json key guests is not in the correct format. Expected objects with a name key.".to_string()
                    );
                }
            }
            for event_member in data["event_members"].as_array().map_or(&[][..], Vec::as_slice) {
                if !event_member.is_string() {
                    return Err(
                        "The json key event_members is not in the correct format. Expected strings.".to_string()
                    );
                }
            }
        }
    }

    Ok(())
}
