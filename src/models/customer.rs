//! Customer address row and postal address assembly.

use serde::Serialize;

/// Postal address columns from the `customers` table.
///
/// Address lines are nullable in the dataset; the assembled address skips
/// whatever is missing rather than emitting empty segments.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct CustomerAddress {
    pub address_line_2: Option<String>,
    pub address_line_3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,

    /// Open Location Code suffix recorded for the address
    pub plus_code: Option<String>,
}

impl CustomerAddress {
    /// Assemble a single-line postal address suitable as a distance matrix
    /// origin: comma-separated address parts, with the plus code appended
    /// after a space.
    pub fn formatted(&self) -> String {
        let mut address = [
            self.address_line_2.as_deref(),
            self.address_line_3.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
        ]
        .iter()
        .filter_map(|part| *part)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

        if let Some(code) = self.plus_code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            if !address.is_empty() {
                address.push(' ');
            }
            address.push_str(code);
        }

        address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_joins_all_parts() {
        let address = CustomerAddress {
            address_line_2: Some("12 MG Road".to_string()),
            address_line_3: Some("Indiranagar".to_string()),
            city: Some("Bengaluru".to_string()),
            state: Some("Karnataka".to_string()),
            plus_code: Some("2FCX+HM".to_string()),
        };
        assert_eq!(
            address.formatted(),
            "12 MG Road, Indiranagar, Bengaluru, Karnataka 2FCX+HM"
        );
    }

    #[test]
    fn formatted_skips_missing_parts() {
        let address = CustomerAddress {
            address_line_2: None,
            address_line_3: Some("  ".to_string()),
            city: Some("Mumbai".to_string()),
            state: Some("Maharashtra".to_string()),
            plus_code: None,
        };
        assert_eq!(address.formatted(), "Mumbai, Maharashtra");
    }

    #[test]
    fn formatted_is_empty_when_nothing_is_recorded() {
        let address = CustomerAddress {
            address_line_2: None,
            address_line_3: None,
            city: None,
            state: None,
            plus_code: None,
        };
        assert_eq!(address.formatted(), "");
    }
}
