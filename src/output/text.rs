//! Human-readable report formatter

use super::OutputFormatter;
use crate::diagnostic::{DiagnosticRecord, Severity};
use crate::domain::{Domain, Locale};
use crate::rule::{Rule, Suggestion};
use colored::*;

/// Fixed report strings for one locale
struct Labels {
    error: &'static str,
    priority: &'static str,
    error_type: &'static str,
    dialect: &'static str,
    config_type: &'static str,
    instruction: &'static str,
    command: &'static str,
    line: &'static str,
    explanation: &'static str,
    suggestions: &'static str,
    confidence: &'static str,
}

const EN: Labels = Labels {
    error: "Error",
    priority: "Priority",
    error_type: "Error Type",
    dialect: "SQL Dialect",
    config_type: "Config Type",
    instruction: "Instruction",
    command: "Command",
    line: "Line",
    explanation: "Explanation",
    suggestions: "Smart Suggestions",
    confidence: "Confidence",
};

const ZH: Labels = Labels {
    error: "錯誤",
    priority: "優先級",
    error_type: "錯誤類型",
    dialect: "SQL 方言",
    config_type: "配置類型",
    instruction: "指令",
    command: "命令",
    line: "行號",
    explanation: "說明",
    suggestions: "智能建議",
    confidence: "信心度",
};

fn labels(locale: Locale) -> &'static Labels {
    match locale {
        Locale::En => &EN,
        Locale::Zh => &ZH,
    }
}

/// Label in front of the location line
fn file_label(domain: Domain, locale: Locale) -> &'static str {
    match (domain, locale) {
        (Domain::Docker, _) => "Dockerfile",
        (Domain::Shell, Locale::En) => "Script",
        (Domain::Shell, Locale::Zh) => "腳本",
        (_, Locale::En) => "File",
        (_, Locale::Zh) => "文件",
    }
}

/// SQL reports a character position rather than a column
fn column_label(domain: Domain, locale: Locale) -> &'static str {
    match (domain, locale) {
        (Domain::Sql, Locale::En) => "Position",
        (Domain::Sql, Locale::Zh) => "位置",
        (_, Locale::En) => "Column",
        (_, Locale::Zh) => "列",
    }
}

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Report language
    pub locale: Locale,

    /// Enable colored output
    pub colored: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            locale: Locale::En,
            colored: true,
        }
    }
}

impl TextFormatter {
    /// Create a new text formatter for a locale
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn paint_severity(&self, text: String, severity: Severity) -> ColoredString {
        if !self.colored {
            return text.normal();
        }
        match severity {
            Severity::Critical => text.red().bold(),
            Severity::High => text.red(),
            Severity::Medium => text.yellow().bold(),
            Severity::Low => text.blue(),
        }
    }

    fn heading(&self, text: &str) -> ColoredString {
        if self.colored {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn title(&self, domain: Domain) -> String {
        let name = domain.display_name(self.locale);
        match (self.locale, domain) {
            // "配置錯誤" is written without a space
            (Locale::Zh, Domain::Config) => format!("{}{}", name, ZH.error),
            (locale, _) => format!("{} {}", name, labels(locale).error),
        }
    }

    fn format_location(&self, record: &DiagnosticRecord) -> Option<String> {
        let loc = &record.location;
        let column_label = column_label(record.domain, self.locale);

        if let Some(file) = &loc.file {
            let mut line = format!("{}: {}", file_label(record.domain, self.locale), file);
            if let Some(n) = loc.line {
                match self.locale {
                    Locale::En => {
                        line.push_str(&format!(" (Line {}", n));
                        if let Some(c) = loc.column {
                            line.push_str(&format!(", {} {}", column_label, c));
                        }
                    }
                    Locale::Zh => {
                        line.push_str(&format!(" (第 {} 行", n));
                        if let Some(c) = loc.column {
                            line.push_str(&format!(", 第 {} {}", c, column_label));
                        }
                    }
                }
                line.push(')');
            }
            return Some(line);
        }

        let n = loc.line?;
        let mut line = format!("{}: {}", labels(self.locale).line, n);
        if let Some(c) = loc.column {
            line.push_str(&format!(", {}: {}", column_label, c));
        }
        Some(line)
    }

    fn format_suggestion(&self, index: usize, suggestion: &Suggestion, lang: &str) -> String {
        let labels = labels(self.locale);
        let mut output = format!(
            "\n{}. {} ({}: {}%)\n",
            index,
            suggestion.title(),
            labels.confidence,
            suggestion.percent()
        );
        if !suggestion.code().is_empty() {
            output.push_str(&format!("```{}\n{}\n```\n", lang, suggestion.code()));
        }
        output
    }

    fn format_suggestions(&self, suggestions: &[Suggestion], domain: Domain) -> String {
        let mut output = format!(
            "\n🎯 {}:\n",
            self.heading(labels(self.locale).suggestions)
        );
        for (i, suggestion) in suggestions.iter().enumerate() {
            output.push_str(&self.format_suggestion(i + 1, suggestion, domain.code_language()));
        }
        output
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, record: &DiagnosticRecord) -> String {
        let labels = labels(self.locale);
        let mut output = String::new();

        let header = format!(
            "🚨 {} - {} {}",
            self.title(record.domain),
            record.severity.label(),
            labels.priority
        );
        output.push_str(&format!("{}\n\n", self.paint_severity(header, record.severity)));

        let error_type = if self.colored {
            record.error_type.cyan().to_string()
        } else {
            record.error_type.clone()
        };
        output.push_str(&format!("{}: {}\n", labels.error_type, error_type));

        if let Some(dialect) = &record.extra.dialect {
            output.push_str(&format!("{}: {}\n", labels.dialect, dialect.to_uppercase()));
        }
        if let Some(config_type) = &record.extra.config_type {
            output.push_str(&format!(
                "{}: {}\n",
                labels.config_type,
                config_type.to_uppercase()
            ));
        }
        if let Some(location) = self.format_location(record) {
            output.push_str(&location);
            output.push('\n');
        }
        if let Some(instruction) = &record.extra.instruction {
            output.push_str(&format!("{}: {}\n", labels.instruction, instruction));
        }
        if let Some(command) = &record.extra.command {
            output.push_str(&format!("{}: {}\n", labels.command, command));
        }

        output.push_str(&format!(
            "\n{}: {}\n",
            self.heading(labels.explanation),
            record.explanation
        ));

        if !record.suggestions.is_empty() {
            output.push_str(&self.format_suggestions(&record.suggestions, record.domain));
        }

        output
    }

    fn format_rule(&self, rule: &Rule) -> String {
        let labels = labels(self.locale);
        let mut output = String::new();

        let header = format!("{}/{}", rule.domain(), rule.id());
        output.push_str(&format!(
            "{} [{}]\n",
            self.heading(&header),
            self.paint_severity(rule.severity().to_string(), rule.severity())
        ));
        output.push_str(&format!("  group:   {}\n", rule.group()));
        output.push_str(&format!("  pattern: {}\n", rule.pattern()));
        output.push_str(&format!(
            "\n{}: {}\n",
            self.heading(labels.explanation),
            rule.explanation()
        ));
        output.push_str(&self.format_suggestions(rule.suggestions(), rule.domain()));
        output
    }

    fn format_rules(&self, rules: &[Rule]) -> String {
        let mut output = String::new();
        for (i, rule) in rules.iter().enumerate() {
            output.push_str(&format!(
                "{:>3}. {:<8} {:<10} {:<14} {}\n",
                i + 1,
                rule.domain().as_str(),
                self.paint_severity(rule.severity().to_string(), rule.severity()),
                rule.group(),
                rule.id()
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Extra, Location};
    use pretty_assertions::assert_eq;

    fn record(domain: Domain) -> DiagnosticRecord {
        DiagnosticRecord {
            error_type: "copy_failed".to_string(),
            domain,
            severity: Severity::High,
            message: "COPY failed".to_string(),
            explanation: "Docker can't find the file.".to_string(),
            suggestions: vec![
                Suggestion::new("Check file path", "COPY ./src /app/src", 0.9).unwrap(),
                Suggestion::new("Read the docs", "", 0.5).unwrap(),
            ],
            location: Location::default(),
            extra: Extra::default(),
        }
    }

    #[test]
    fn test_english_report() {
        let mut rec = record(Domain::Docker);
        rec.location = Location::new().with_file("Dockerfile").with_line(4);
        rec.extra.instruction = Some("COPY".to_string());

        let text = TextFormatter::new(Locale::En).without_color().format(&rec);
        let expected = "🚨 Docker Error - HIGH Priority\n\n\
Error Type: copy_failed\n\
Dockerfile: Dockerfile (Line 4)\n\
Instruction: COPY\n\
\nExplanation: Docker can't find the file.\n\
\n🎯 Smart Suggestions:\n\
\n1. Check file path (Confidence: 90%)\n\
```dockerfile\nCOPY ./src /app/src\n```\n\
\n2. Read the docs (Confidence: 50%)\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_chinese_report() {
        let mut rec = record(Domain::Config);
        rec.error_type = "yaml_syntax_error".to_string();
        rec.location = Location::new()
            .with_file("config.yaml")
            .with_line(10)
            .with_column(5);
        rec.extra.config_type = Some("yaml".to_string());

        let text = TextFormatter::new(Locale::Zh).without_color().format(&rec);
        assert!(text.starts_with("🚨 配置錯誤 - HIGH 優先級\n\n"));
        assert!(text.contains("錯誤類型: yaml_syntax_error\n"));
        assert!(text.contains("配置類型: YAML\n"));
        assert!(text.contains("文件: config.yaml (第 10 行, 第 5 列)\n"));
        assert!(text.contains("說明: "));
        assert!(text.contains("🎯 智能建議:"));
        assert!(text.contains("(信心度: 90%)"));
        assert!(text.contains("```yaml\n"));
    }

    #[test]
    fn test_sql_line_without_file() {
        let mut rec = record(Domain::Sql);
        rec.location = Location::new().with_line(3).with_column(15);
        rec.extra.dialect = Some("postgresql".to_string());

        let en = TextFormatter::new(Locale::En).without_color().format(&rec);
        assert!(en.contains("SQL Dialect: POSTGRESQL\n"));
        assert!(en.contains("Line: 3, Position: 15\n"));

        let zh = TextFormatter::new(Locale::Zh).without_color().format(&rec);
        assert!(zh.contains("SQL 方言: POSTGRESQL\n"));
        assert!(zh.contains("行號: 3, 位置: 15\n"));
    }

    #[test]
    fn test_shell_labels() {
        let mut rec = record(Domain::Shell);
        rec.location = Location::new().with_file("deploy.sh").with_line(12);
        rec.extra.command = Some("kubectl".to_string());

        let en = TextFormatter::new(Locale::En).without_color().format(&rec);
        assert!(en.starts_with("🚨 Shell/Bash Error - HIGH Priority"));
        assert!(en.contains("Script: deploy.sh (Line 12)\n"));
        assert!(en.contains("Command: kubectl\n"));

        let zh = TextFormatter::new(Locale::Zh).without_color().format(&rec);
        assert!(zh.contains("腳本: deploy.sh (第 12 行)\n"));
        assert!(zh.contains("命令: kubectl\n"));
    }

    #[test]
    fn test_file_without_line() {
        let mut rec = record(Domain::Kotlin);
        rec.location = Location::new().with_file("Main.kt");
        let text = TextFormatter::new(Locale::En).without_color().format(&rec);
        assert!(text.contains("File: Main.kt\n"));
    }

    #[test]
    fn test_colored_keeps_error_type() {
        colored::control::set_override(true);
        let text = TextFormatter::new(Locale::En).format(&record(Domain::Docker));
        assert!(text.contains("copy_failed"));
        assert!(text.contains("HIGH"));
    }

    #[test]
    fn test_format_rules_listing() {
        let rule = Rule::new(
            Domain::Sql,
            "deadlock",
            "deadlock",
            Severity::Critical,
            "Two transactions wait on each other.",
            vec![Suggestion::new("Retry", "", 0.8).unwrap()],
        )
        .unwrap()
        .with_group("performance");
        let formatter = TextFormatter::new(Locale::En).without_color();

        let listing = formatter.format_rules(std::slice::from_ref(&rule));
        assert!(listing.contains("deadlock"));
        assert!(listing.contains("performance"));

        let detail = formatter.format_rule(&rule);
        assert!(detail.starts_with("sql/deadlock [critical]\n"));
        assert!(detail.contains("Two transactions wait on each other."));
        assert!(detail.contains("1. Retry (Confidence: 80%)"));
    }
}
