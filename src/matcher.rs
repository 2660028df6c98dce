//! First-match rule selection

use crate::rule::Rule;

/// Walks a domain's ordered rules and picks the first that matches
pub struct Matcher<'r> {
    rules: &'r [Rule],
}

impl<'r> Matcher<'r> {
    pub fn new(rules: &'r [Rule]) -> Self {
        Self { rules }
    }

    /// The earliest rule whose pattern is found in the text
    pub fn first_match(&self, text: &str) -> Option<&'r Rule> {
        let found = self.rules.iter().find(|rule| rule.is_match(text));
        match found {
            Some(rule) => log::debug!("Matched rule {}/{}", rule.domain(), rule.id()),
            None => log::debug!("No rule matched among {} candidates", self.rules.len()),
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;
    use crate::domain::Domain;
    use crate::rule::Suggestion;

    fn rule(id: &str, pattern: &str) -> Rule {
        Rule::new(
            Domain::Shell,
            id,
            pattern,
            Severity::High,
            "x",
            vec![Suggestion::new("t", "", 0.8).unwrap()],
        )
        .unwrap()
    }

    #[test]
    fn test_first_rule_wins() {
        let rules = vec![
            rule("no_such_file", "No such file or directory"),
            rule("command_not_found", "(?:command not found|No such file or directory)"),
        ];
        let matcher = Matcher::new(&rules);
        let hit = matcher.first_match("./run.sh: No such file or directory").unwrap();
        assert_eq!(hit.id(), "no_such_file");
        assert_eq!(
            matcher.first_match("bash: foo: command not found").unwrap().id(),
            "command_not_found"
        );
    }

    #[test]
    fn test_no_match() {
        let rules = vec![rule("a", "alpha")];
        assert!(Matcher::new(&rules).first_match("beta").is_none());
        assert!(Matcher::new(&[]).first_match("alpha").is_none());
    }
}
