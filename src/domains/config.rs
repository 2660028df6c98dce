//! YAML/JSON configuration, CI pipelines and Kubernetes manifests

use super::{fallback, group, RuleDef};
use crate::diagnostic::{ExtraField, Severity};
use crate::domain::Domain;
use crate::extract::{ContextExtractor, ExtractionTemplate, SubtypeDetector};
use crate::profile::DomainProfile;
use crate::rule::RuleError;

const SCHEMA: &[RuleDef] = &[
    RuleDef {
        id: "schema_validation_failed",
        pattern: r"(?:schema validation|does not match schema|ValidationError|schema error|Schema error)",
        severity: Severity::High,
        explanation: "Configuration does not match expected schema.",
        suggestions: &[
            (
                "Check schema requirements",
                "# Validate against schema\n# For JSON Schema\najv validate -s schema.json -d config.json\n\n# For YAML\nyamllint config.yaml",
                0.85,
            ),
            (
                "Review schema documentation",
                "# Common schema issues:\n# - Missing required fields\n# - Wrong data types\n# - Invalid enum values\n# - Pattern mismatches",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "invalid_reference",
        pattern: r"(?:reference .+ not found|cannot resolve|undefined reference|broken reference)",
        severity: Severity::Medium,
        explanation: "Configuration contains invalid reference or link.",
        suggestions: &[
            (
                "Check references",
                "# YAML anchors and aliases\ndefaults: &defaults\n  timeout: 30\n  retries: 3\n\njob1:\n  <<: *defaults\n  script: test.sh",
                0.85,
            ),
            (
                "Verify external references",
                "# Check file paths\ninclude: ./common/base.yaml\n\n# Check URLs\nimage: registry.com/namespace/image:tag",
                0.80,
            ),
        ],
    },
];

const CICD: &[RuleDef] = &[
    RuleDef {
        id: "github_actions_syntax",
        pattern: r"(?:workflow syntax|invalid workflow file|error in workflow|action.yml)",
        severity: Severity::High,
        explanation: "GitHub Actions workflow syntax error.",
        suggestions: &[
            (
                "Check workflow syntax",
                "name: CI\non:\n  push:\n    branches: [ main ]\njobs:\n  build:\n    runs-on: ubuntu-latest\n    steps:\n      - uses: actions/checkout@v3\n      - name: Run tests\n        run: npm test",
                0.90,
            ),
            (
                "Validate locally",
                "# Use act to test locally\nact -n  # Dry run\n\n# Or GitHub CLI\ngh workflow view",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "gitlab_ci_syntax",
        pattern: r"(?:gitlab-ci\.yml|jobs:.+ config|Invalid configuration|yaml invalid|\.gitlab-ci)",
        severity: Severity::High,
        explanation: "GitLab CI configuration error.",
        suggestions: &[
            (
                "Check .gitlab-ci.yml syntax",
                "stages:\n  - build\n  - test\n  - deploy\n\nbuild-job:\n  stage: build\n  script:\n    - echo \"Building...\"\n    - npm install\n    - npm run build",
                0.90,
            ),
            (
                "Use CI Lint tool",
                "# Validate in GitLab UI:\n# Project > CI/CD > CI Lint\n\n# Or use GitLab API",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "circleci_config",
        pattern: r"(?:\.circleci|circle\.yml|circleci.*config|Invalid config.*job|Schema error.*circle)",
        severity: Severity::High,
        explanation: "CircleCI configuration error.",
        suggestions: &[
            (
                "Check CircleCI config",
                "version: 2.1\njobs:\n  build:\n    docker:\n      - image: cimg/node:16.0\n    steps:\n      - checkout\n      - run: npm install\n      - run: npm test",
                0.85,
            ),
            (
                "Validate config",
                "# Use CircleCI CLI\ncircleci config validate\n\n# Pack and process\ncircleci config process .circleci/config.yml",
                0.80,
            ),
        ],
    },
];

const KUBERNETES: &[RuleDef] = &[
    RuleDef {
        id: "k8s_api_version",
        pattern: r"(?:unknown api version|no matches for kind|could not find api|apiVersion .+ is not available)",
        severity: Severity::High,
        explanation: "Invalid or unsupported Kubernetes API version.",
        suggestions: &[
            (
                "Use correct API version",
                "# Common API versions\napiVersion: v1  # Pod, Service, ConfigMap\napiVersion: apps/v1  # Deployment, StatefulSet\napiVersion: batch/v1  # Job\napiVersion: networking.k8s.io/v1  # Ingress",
                0.90,
            ),
            (
                "Check cluster version",
                "# Check available APIs\nkubectl api-versions\n\n# Check specific resource\nkubectl explain deployment.apiVersion",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "k8s_missing_required",
        pattern: r"(?:missing required field|required key .+ not found|must specify|is required)",
        severity: Severity::High,
        explanation: "Required field missing in Kubernetes configuration.",
        suggestions: &[(
            "Add required fields",
            "# Minimal required fields\napiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: my-app\nspec:\n  replicas: 1\n  selector:\n    matchLabels:\n      app: my-app\n  template:\n    metadata:\n      labels:\n        app: my-app\n    spec:\n      containers:\n      - name: app\n        image: myimage:latest",
            0.90,
        )],
    },
    RuleDef {
        id: "k8s_invalid_resource",
        pattern: r"(?:unknown field|ValidationError|invalid type|cannot unmarshal)",
        severity: Severity::Medium,
        explanation: "Invalid field or value in Kubernetes resource.",
        suggestions: &[
            (
                "Validate resource schema",
                "# Validate before applying\nkubectl apply --dry-run=client -f config.yaml\n\n# Explain resource fields\nkubectl explain deployment.spec",
                0.85,
            ),
            (
                "Check field names",
                "# Common mistakes\n# replica: 3  # Wrong\nreplicas: 3  # Correct\n\n# container:  # Wrong  \ncontainers:  # Correct",
                0.80,
            ),
        ],
    },
];

// Most specific JSON failures first; json_parse_error catches the rest
const JSON: &[RuleDef] = &[
    RuleDef {
        id: "json_trailing_comma",
        pattern: r"(?:trailing comma|Expecting 'EOF', got '}')",
        severity: Severity::High,
        explanation: "JSON does not allow trailing commas.",
        suggestions: &[(
            "Remove trailing comma",
            "// Correct:\n{\n  \"key1\": \"value1\",\n  \"key2\": \"value2\"\n}\n\n// Incorrect:\n{\n  \"key1\": \"value1\",\n  \"key2\": \"value2\",  // <- trailing comma\n}",
            0.95,
        )],
    },
    RuleDef {
        id: "json_single_quotes",
        pattern: r"(?:Unexpected token '|Single quotes not allowed|Expected double-quoted property)",
        severity: Severity::High,
        explanation: "JSON requires double quotes, not single quotes.",
        suggestions: &[(
            "Use double quotes",
            "// Correct:\n{\n  \"key\": \"value\"\n}\n\n// Incorrect:\n{\n  'key': 'value'\n}",
            0.95,
        )],
    },
    RuleDef {
        id: "json_unquoted_key",
        pattern: r"(?:Expecting property name enclosed|Expected string but found identifier|Unquoted key)",
        severity: Severity::High,
        explanation: "JSON keys must be quoted strings.",
        suggestions: &[(
            "Quote all keys",
            "// Correct:\n{\n  \"name\": \"value\",\n  \"count\": 123\n}\n\n// Incorrect:\n{\n  name: \"value\",\n  count: 123\n}",
            0.95,
        )],
    },
    RuleDef {
        id: "json_parse_error",
        pattern: r"(?:JSON\.parse.*Unexpected token|SyntaxError.*JSON|Parse error.*JSON|JSON5:)",
        severity: Severity::High,
        explanation: "JSON parsing error. Check for syntax issues like missing commas or quotes.",
        suggestions: &[
            (
                "Validate JSON syntax",
                "{\n  \"key\": \"value\",\n  \"number\": 123,\n  \"array\": [1, 2, 3],\n  \"nested\": {\n    \"key\": \"value\"\n  }\n}",
                0.90,
            ),
            (
                "Common JSON fixes",
                "// Check for:\n// - Missing commas between items\n// - Trailing commas (not allowed)\n// - Single quotes (use double)\n// - Unquoted keys",
                0.85,
            ),
        ],
    },
];

const YAML: &[RuleDef] = &[
    RuleDef {
        id: "yaml_indentation",
        pattern: r"(?:inconsistent indentation|bad indentation|found character .+ that cannot start any token|indentation|while scanning.*found character)",
        severity: Severity::High,
        explanation: "YAML indentation error. YAML requires consistent indentation with spaces.",
        suggestions: &[
            (
                "Use consistent indentation",
                "# Use 2 spaces for each level\nparent:\n  child:\n    grandchild: value\n\n# NOT tabs or mixed spaces",
                0.95,
            ),
            (
                "Configure editor for YAML",
                "# .editorconfig\n[*.{yml,yaml}]\nindent_style = space\nindent_size = 2",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "yaml_syntax_error",
        pattern: r"(?:yaml|yml).+(?:scanner|parser|could not find expected|mapping values|while scanning|while parsing|expected .+ but found)",
        severity: Severity::High,
        explanation: "YAML syntax error. Check for missing colons, quotes, or structural issues.",
        suggestions: &[
            (
                "Check YAML syntax rules",
                "# Valid YAML syntax\nkey: value\nlist:\n  - item1\n  - item2\nmapping:\n  key1: value1\n  key2: value2",
                0.90,
            ),
            (
                "Quote special characters",
                "# Quote strings with special chars\nspecial: \"value: with colon\"\nversion: \"1.0\"  # Numbers as strings\nboolean: \"yes\"  # Not interpreted as bool",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "yaml_duplicate_key",
        pattern: r"(?:duplicate key|found duplicate key|key .+ already defined)",
        severity: Severity::High,
        explanation: "Duplicate key found in YAML. Each key must be unique within its scope.",
        suggestions: &[
            (
                "Remove or rename duplicate keys",
                "# Each key must be unique\nservices:\n  web: {...}\n  api: {...}  # Different name\n  # web: {...}  # Would be duplicate",
                0.95,
            ),
            (
                "Use arrays for multiple values",
                "# For multiple similar items\nservers:\n  - name: server1\n    host: host1\n  - name: server2\n    host: host2",
                0.90,
            ),
        ],
    },
    RuleDef {
        id: "yaml_invalid_value",
        pattern: r"(?:expected .+ but found|invalid value|could not determine a constructor)",
        severity: Severity::Medium,
        explanation: "Invalid value type or format in YAML.",
        suggestions: &[
            (
                "Check value types",
                "# Common YAML values\nstring: \"text\"\nnumber: 123\nfloat: 12.34\nboolean: true\nnull_value: null\narray: [1, 2, 3]",
                0.85,
            ),
            (
                "Use proper boolean values",
                "# YAML booleans\nenabled: true   # or yes, on\ndisabled: false # or no, off\n# NOT \"true\" (string)",
                0.80,
            ),
        ],
    },
];

/// Location templates, most specific first
const TEMPLATES: &[&str] = &[
    r#"(?im)"(?P<file>[^"]+\.(?:ya?ml|json))".*?line (?P<line>\d+)"#,
    r"(?im)error in (?P<file>[^:\s]+\.(?:ya?ml|json)) at line (?P<line>\d+)",
    r"(?im)(?P<file>[^:\s]+\.(?:ya?ml|json)):(?P<line>\d+):(?P<column>\d+)",
    r"(?im)(?P<file>[^:\s]+\.(?:ya?ml|json)): line (?P<line>\d+):(?P<column>\d+)",
    r#"(?im)(?:in |at |from )"(?P<file>[^"]+\.(?:ya?ml|json))":(?P<line>\d+):(?P<column>\d+)"#,
    r"(?im)(?:in |at |from )(?P<file>[^:\s]+\.(?:ya?ml|json)):(?P<line>\d+):(?P<column>\d+)",
    r#"(?im)(?:in |at |from )"(?P<file>[^"]+\.(?:ya?ml|json))" at line (?P<line>\d+)"#,
    r"(?im)line (?P<line>\d+), column (?P<column>\d+)",
    r"(?im)line (?P<line>\d+):(?P<column>\d+)",
    r"(?im):(?P<line>\d+):(?P<column>\d+)",
    r"(?im)at line (?P<line>\d+)",
];

fn config_type_detector() -> SubtypeDetector {
    SubtypeDetector::new(ExtraField::ConfigType)
        .with_indicators(
            "k8s",
            &["kubernetes", "k8s", "kubectl", "apiVersion", "kind:", "ValidationError", "io.k8s"],
        )
        .with_indicators("github", &["github", "workflow", "actions/", ".github/workflows"])
        .with_indicators("gitlab", &["gitlab", ".gitlab-ci", "gitlab-ci.yml"])
        .with_indicators("circleci", &["circleci", "circle.yml", ".circleci"])
        .with_indicators("docker-compose", &["docker-compose", "compose.yml", "compose.yaml"])
        .with_indicators("json", &["json", "JSON.parse", ".json", "JSON5"])
        .with_indicators("yaml", &["yaml", "yml", ".yaml", ".yml"])
}

pub fn profile() -> Result<DomainProfile, RuleError> {
    let domain = Domain::Config;

    let mut extractor = ContextExtractor::new();
    for pattern in TEMPLATES {
        extractor = extractor.with_template(ExtractionTemplate::new(pattern)?);
    }
    extractor = extractor.with_detector(config_type_detector());

    Ok(DomainProfile::new(domain)
        .with_group(group(domain, "schema", SCHEMA)?)
        .with_group(group(domain, "cicd", CICD)?)
        .with_group(group(domain, "kubernetes", KUBERNETES)?)
        .with_group(group(domain, "json", JSON)?)
        .with_group(group(domain, "yaml", YAML)?)
        .with_extractor(extractor)
        .with_fallback(fallback(
            "This appears to be a configuration error, but doesn't match common patterns.",
            &[
                (
                    "Validate configuration syntax",
                    "# For YAML\nyamllint config.yaml\n\n# For JSON\njq . config.json\n\n# Online validators also available",
                    0.5,
                ),
                (
                    "Check configuration documentation",
                    "# Review the official documentation\n# for your specific tool/platform",
                    0.5,
                ),
            ],
        )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::registry::PatternRegistry;

    fn engine() -> Engine {
        let mut registry = PatternRegistry::new();
        registry.register(profile().unwrap());
        Engine::new(registry)
    }

    fn classify(text: &str) -> String {
        engine().analyze(Domain::Config, text).unwrap().error_type
    }

    #[test]
    fn test_yaml_errors() {
        assert_eq!(
            classify("found character '\\t' that cannot start any token"),
            "yaml_indentation"
        );
        assert_eq!(
            classify("yaml: line 3: mapping values are not allowed in this context"),
            "yaml_syntax_error"
        );
        assert_eq!(classify("found duplicate key \"name\""), "yaml_duplicate_key");
        assert_eq!(
            classify("could not determine a constructor for the tag '!Ref'"),
            "yaml_invalid_value"
        );
    }

    #[test]
    fn test_json_specific_before_generic() {
        assert_eq!(
            classify("SyntaxError: JSON.parse: trailing comma in object"),
            "json_trailing_comma"
        );
        assert_eq!(
            classify("SyntaxError: Expected double-quoted property name in JSON at position 2"),
            "json_single_quotes"
        );
        assert_eq!(
            classify("json.decoder.JSONDecodeError: Expecting property name enclosed in double quotes"),
            "json_unquoted_key"
        );
        assert_eq!(
            classify("SyntaxError: Unexpected end of JSON input"),
            "json_parse_error"
        );
    }

    #[test]
    fn test_schema_before_kubernetes() {
        assert_eq!(
            classify("error validating data: ValidationError(Deployment.spec)"),
            "schema_validation_failed"
        );
    }

    #[test]
    fn test_kubernetes_and_ci() {
        assert_eq!(
            classify("no matches for kind \"Deployment\" in version \"extensions/v1beta1\""),
            "k8s_api_version"
        );
        assert_eq!(
            classify("error: error validating \"pod.yaml\": missing required field \"containers\""),
            "k8s_missing_required"
        );
        assert_eq!(
            classify("Invalid workflow file: .github/workflows/ci.yml#L12"),
            "github_actions_syntax"
        );
        assert_eq!(classify("Found errors in your .gitlab-ci.yml"), "gitlab_ci_syntax");
    }

    #[test]
    fn test_location_templates() {
        let engine = engine();
        let ctx = engine.extract(Domain::Config, "config.yaml:10:5: syntax error");
        assert_eq!(ctx.location.file.as_deref(), Some("config.yaml"));
        assert_eq!(ctx.location.line, Some(10));
        assert_eq!(ctx.location.column, Some(5));

        let ctx = engine.extract(Domain::Config, "error in deploy.yml at line 7");
        assert_eq!(ctx.location.file.as_deref(), Some("deploy.yml"));
        assert_eq!(ctx.location.line, Some(7));
        assert_eq!(ctx.location.column, None);

        let ctx = engine.extract(
            Domain::Config,
            "while parsing a block mapping\n  in \"values.yaml\", line 4, column 3",
        );
        assert_eq!(ctx.location.file.as_deref(), Some("values.yaml"));
        assert_eq!(ctx.location.line, Some(4));

        let ctx = engine.extract(Domain::Config, "Unexpected token at line 12, column 8");
        assert_eq!(ctx.location.file, None);
        assert_eq!(ctx.location.line, Some(12));
        assert_eq!(ctx.location.column, Some(8));
    }

    #[test]
    fn test_config_type_priority() {
        let engine = engine();
        let detect = |text: &str| engine.extract(Domain::Config, text).extra.config_type;
        assert_eq!(detect("kubectl apply -f deploy.yaml").as_deref(), Some("k8s"));
        assert_eq!(detect(".github/workflows/ci.yml").as_deref(), Some("github"));
        assert_eq!(detect("docker-compose.yml is invalid").as_deref(), Some("docker-compose"));
        assert_eq!(detect("package.json broken").as_deref(), Some("json"));
        assert_eq!(detect("bad.yml").as_deref(), Some("yaml"));
        assert_eq!(detect("something else").as_deref(), None);
    }

    #[test]
    fn test_fallback_suggestions() {
        let record = engine()
            .analyze(Domain::Config, "config.yaml:10:5: syntax error")
            .unwrap();
        assert_eq!(record.error_type, "unknown_config_error");
        assert_eq!(record.suggestions.len(), 2);
        assert!(record.suggestions.iter().all(|s| s.confidence() == 0.5));
    }
}
