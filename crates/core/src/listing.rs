//! List-endpoint query helpers: ordering whitelists, search terms, id lists.

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// A client-facing ordering field and the SQL expression it sorts by.
#[derive(Debug, Clone, Copy)]
pub struct OrderField {
    pub name: &'static str,
    pub column: &'static str,
}

/// The fields an endpoint may be ordered by, plus its default ordering.
#[derive(Debug, Clone, Copy)]
pub struct Ordering {
    pub fields: &'static [OrderField],
    pub default: &'static [&'static str],
    /// Appended to every clause so equal sort keys stay deterministic.
    pub tiebreak: &'static str,
}

impl Ordering {
    /// Resolve `?ordering=a,-b` into an `ORDER BY` body.
    ///
    /// Unknown fields are dropped. When nothing valid remains the default
    /// ordering applies. Only expressions from the whitelist reach the SQL.
    pub fn order_by(&self, raw: Option<&str>) -> String {
        let requested: Vec<String> = raw
            .unwrap_or_default()
            .split(',')
            .filter_map(|term| self.resolve(term.trim()))
            .collect();

        let mut terms = if requested.is_empty() {
            self.default
                .iter()
                .filter_map(|term| self.resolve(term))
                .collect()
        } else {
            requested
        };
        terms.push(self.tiebreak.to_string());
        terms.join(", ")
    }

    fn resolve(&self, term: &str) -> Option<String> {
        let (name, descending) = match term.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (term, false),
        };
        let field = self.fields.iter().find(|f| f.name == name)?;
        Some(if descending {
            format!("{} DESC", field.column)
        } else {
            format!("{} ASC", field.column)
        })
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Split a `?search=` value into `ILIKE` patterns, one per term.
///
/// Terms are separated by whitespace or commas. `%`, `_` and `\` inside a
/// term are escaped so they match literally. Every pattern must match for a
/// row to be included.
pub fn search_patterns(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .map(|term| {
            let mut escaped = String::with_capacity(term.len() + 2);
            escaped.push('%');
            for c in term.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    escaped.push('\\');
                }
                escaped.push(c);
            }
            escaped.push('%');
            escaped
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Id lists
// ---------------------------------------------------------------------------

pub const MSG_COMPARE_IDS_REQUIRED: &str = "Please provide aircraft IDs to compare";
pub const MSG_COMPARE_IDS_INVALID: &str = "Invalid aircraft ID format";

/// Parse `?ids=1,2,3` for the compare endpoint.
///
/// A missing or empty parameter and any token that is not an integer are
/// both validation errors. Duplicates are removed, order is kept.
pub fn parse_id_list(raw: Option<&str>) -> Result<Vec<DbId>, CoreError> {
    let raw = raw.unwrap_or_default();
    if raw.is_empty() {
        return Err(CoreError::Validation(MSG_COMPARE_IDS_REQUIRED.into()));
    }

    let mut ids: Vec<DbId> = Vec::new();
    for token in raw.split(',') {
        let id: DbId = token
            .trim()
            .parse()
            .map_err(|_| CoreError::Validation(MSG_COMPARE_IDS_INVALID.into()))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const TEST_ORDERING: Ordering = Ordering {
        fields: &[
            OrderField { name: "model", column: "a.model" },
            OrderField { name: "top_speed", column: "a.top_speed" },
            OrderField { name: "manufacturer__name", column: "m.name" },
        ],
        default: &["manufacturer__name", "model"],
        tiebreak: "a.id ASC",
    };

    #[test]
    fn default_ordering_when_absent() {
        assert_eq!(
            TEST_ORDERING.order_by(None),
            "m.name ASC, a.model ASC, a.id ASC"
        );
    }

    #[test]
    fn descending_and_multiple_fields() {
        assert_eq!(
            TEST_ORDERING.order_by(Some("-top_speed, model")),
            "a.top_speed DESC, a.model ASC, a.id ASC"
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        assert_eq!(
            TEST_ORDERING.order_by(Some("password,-top_speed")),
            "a.top_speed DESC, a.id ASC"
        );
        assert_eq!(
            TEST_ORDERING.order_by(Some("1; DROP TABLE aircraft")),
            "m.name ASC, a.model ASC, a.id ASC"
        );
    }

    #[test]
    fn search_terms_split_and_escape() {
        assert_eq!(
            search_patterns(Some("cessna 172")),
            vec!["%cessna%".to_string(), "%172%".to_string()]
        );
        assert_eq!(search_patterns(Some("a,b")), vec!["%a%", "%b%"]);
        assert_eq!(search_patterns(Some("50%_off")), vec!["%50\\%\\_off%"]);
        assert!(search_patterns(Some("   ")).is_empty());
        assert!(search_patterns(None).is_empty());
    }

    #[test]
    fn id_list_parses_and_dedupes() {
        assert_eq!(parse_id_list(Some("3, 1,3")).unwrap(), vec![3, 1]);
        assert_eq!(parse_id_list(Some("999999")).unwrap(), vec![999999]);
    }

    #[test]
    fn id_list_rejects_missing_and_malformed() {
        assert_matches!(
            parse_id_list(None),
            Err(CoreError::Validation(msg)) if msg == MSG_COMPARE_IDS_REQUIRED
        );
        assert_matches!(
            parse_id_list(Some("")),
            Err(CoreError::Validation(msg)) if msg == MSG_COMPARE_IDS_REQUIRED
        );
        assert_matches!(
            parse_id_list(Some("abc")),
            Err(CoreError::Validation(msg)) if msg == MSG_COMPARE_IDS_INVALID
        );
        assert_matches!(
            parse_id_list(Some("1,,2")),
            Err(CoreError::Validation(msg)) if msg == MSG_COMPARE_IDS_INVALID
        );
    }
}
