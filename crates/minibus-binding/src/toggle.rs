use minibus_types::{TOGGLE_FALSE, TOGGLE_TRUE};

/// The value a toggle moves to from `current`.
///
/// Only the literal `"true"` flips to `"false"`. An absent value, or any
/// other string, counts as `"false"` and flips to `"true"`.
pub fn toggled(current: Option<&str>) -> &'static str {
    match current {
        Some(TOGGLE_TRUE) => TOGGLE_FALSE,
        _ => TOGGLE_TRUE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flips_between_literals() {
        assert_eq!(toggled(None), "true");
        assert_eq!(toggled(Some("false")), "true");
        assert_eq!(toggled(Some("true")), "false");
        assert_eq!(toggled(Some("maybe")), "true");
        assert_eq!(toggled(Some("TRUE")), "true");
    }
}
