use crate::error::{Error, Result};
use crate::models::GeneratedRoasts;

pub fn parse_roast_response(response: &str) -> Result<GeneratedRoasts> {
    let json_str = extract_json(response)?;

    let generated: GeneratedRoasts = serde_json::from_str(&json_str)
        .map_err(|e| Error::ParseError(format!("Failed to parse roast response: {}", e)))?;

    let roasts: Vec<_> = generated
        .roasts
        .into_iter()
        .filter(|r| !r.text.trim().is_empty())
        .collect();

    if roasts.is_empty() {
        return Err(Error::ParseError("Roast response contained no roasts".to_string()));
    }

    Ok(GeneratedRoasts {
        roasts,
        overall_tone: generated.overall_tone,
    })
}

fn extract_json(text: &str) -> Result<String> {
    // Markdown ```json fence
    if let Some(start) = text.find("```json") {
        let start = start + 7;
        if let Some(end) = text[start..].find("```") {
            return Ok(text[start..start + end].trim().to_string());
        }
    }

    // Plain fence, skipping any language tag on the opening line
    if let Some(start) = text.find("```") {
        let start = start + 3;
        let start = text[start..]
            .find('\n')
            .map(|i| start + i + 1)
            .unwrap_or(start);
        if let Some(end) = text[start..].find("```") {
            let content = text[start..start + end].trim();
            if content.starts_with('{') {
                return Ok(content.to_string());
            }
        }
    }

    // Bare object: scan to the matching closing brace
    if let Some(start) = text.find('{') {
        let mut depth = 0;
        let mut end = start;
        let mut in_string = false;
        let mut escape_next = false;

        for (i, c) in text[start..].char_indices() {
            if escape_next {
                escape_next = false;
                continue;
            }

            match c {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        end = start + i + 1;
                        break;
                    }
                }
                _ => {}
            }
        }

        if depth == 0 && end > start {
            return Ok(text[start..end].to_string());
        }
    }

    Err(Error::ParseError("No valid JSON found in response".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_markdown() {
        let input = r#"Here are your roasts:
```json
{"roasts": []}
```
"#;
        let result = extract_json(input).unwrap();
        assert_eq!(result, r#"{"roasts": []}"#);
    }

    #[test]
    fn test_extract_raw_json_with_emoji() {
        let input = r#"Sure! {"roasts": [{"text": "🔥 {hot}"}], "overall_tone": "rookie"} enjoy"#;
        let result = extract_json(input).unwrap();
        assert_eq!(
            result,
            r#"{"roasts": [{"text": "🔥 {hot}"}], "overall_tone": "rookie"}"#
        );
    }

    #[test]
    fn test_parse_roast_response() {
        let input = r#"{"roasts": [
            {"text": "Your commits are a crime scene.", "category": "commit_messages", "severity": "savage"},
            {"text": "   "}
        ], "overall_tone": "chaos_engineer"}"#;
        let generated = parse_roast_response(input).unwrap();
        assert_eq!(generated.roasts.len(), 1);
        assert_eq!(generated.roasts[0].severity, "savage");
        assert_eq!(generated.overall_tone, "chaos_engineer");
    }

    #[test]
    fn test_parse_rejects_empty_roasts() {
        assert!(parse_roast_response(r#"{"roasts": []}"#).is_err());
        assert!(parse_roast_response("no json here").is_err());
    }
}
