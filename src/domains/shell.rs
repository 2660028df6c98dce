//! Shell and Bash scripts
//!
//! Groups are registered from most to least specific: control flow, I/O,
//! arrays, special options, then general syntax. Several messages match
//! rules in more than one group, so this order is part of the contract:
//!
//! - `syntax error near unexpected token` is `unexpected_token_near`, not
//!   `syntax_error`
//! - `No such file or directory` is `no_such_file`, not `command_not_found`

use super::{fallback, group, RuleDef};
use crate::diagnostic::{ExtraField, Severity};
use crate::domain::Domain;
use crate::extract::{ContextExtractor, ExtractionTemplate, FieldCapture, Transform};
use crate::profile::DomainProfile;
use crate::rule::RuleError;

const CONTROL: &[RuleDef] = &[
    RuleDef {
        id: "unexpected_token_near",
        pattern: r"syntax error near unexpected token",
        severity: Severity::High,
        explanation: "Syntax error in control structure (if, for, while, etc).",
        suggestions: &[
            (
                "Check control structure syntax",
                "# Correct if statement\nif [ condition ]; then\n    commands\nelif [ condition ]; then\n    commands\nelse\n    commands\nfi",
                0.90,
            ),
            (
                "Verify loop syntax",
                "# For loop\nfor i in {1..10}; do\n    echo $i\ndone\n\n# While loop\nwhile [ condition ]; do\n    commands\ndone",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "missing_keyword",
        pattern: r#"(?:unexpected EOF while looking for matching|missing [`'"])"#,
        severity: Severity::High,
        explanation: "Missing closing keyword or bracket in control structure.",
        suggestions: &[
            (
                "Check matching keywords",
                "# Every if needs fi\nif [ test ]; then\n    echo \"test\"\nfi\n\n# Every case needs esac\ncase $var in\n    pattern) commands ;;\nesac",
                0.95,
            ),
            (
                "Verify bracket matching",
                "# Match all brackets\n{ command1; command2; }\n( subshell commands )\n[[ test expression ]]",
                0.90,
            ),
        ],
    },
];

const IO: &[RuleDef] = &[
    RuleDef {
        id: "no_such_file",
        pattern: r"No such file or directory",
        severity: Severity::High,
        explanation: "The specified file or directory does not exist.",
        suggestions: &[
            (
                "Check file existence",
                "# Test if file exists\nif [ -f \"file.txt\" ]; then\n    cat file.txt\nfi",
                0.90,
            ),
            (
                "Create missing directory",
                "# Create directory if missing\nmkdir -p /path/to/directory",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "cannot_overwrite",
        pattern: r"(?:cannot overwrite|File exists)",
        severity: Severity::Medium,
        explanation: "Cannot overwrite existing file.",
        suggestions: &[
            (
                "Use noclobber option",
                "# Enable noclobber\nset -C\n# Force overwrite\ncommand >| file.txt",
                0.85,
            ),
            (
                "Check before writing",
                "# Backup existing file\nif [ -f \"file.txt\" ]; then\n    mv file.txt file.txt.bak\nfi",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "broken_pipe",
        pattern: r"Broken pipe",
        severity: Severity::Medium,
        explanation: "The process reading from the pipe terminated before reading all data.",
        suggestions: &[
            (
                "Handle SIGPIPE",
                "# Ignore broken pipe\ntrap \"\" PIPE\n# Or handle gracefully\ntrap \"echo Pipeline broken\" PIPE",
                0.85,
            ),
            (
                "Check pipeline components",
                "# Use pipefail option\nset -o pipefail\n# Check pipeline status\ncommand1 | command2\necho ${PIPESTATUS[@]}",
                0.80,
            ),
        ],
    },
];

const ARRAY: &[RuleDef] = &[
    RuleDef {
        id: "array_subscript",
        pattern: r"(?:bad array subscript|invalid subscript)",
        severity: Severity::Medium,
        explanation: "Invalid array index or subscript.",
        suggestions: &[
            (
                "Use proper array syntax",
                "# Declare array\narr=(element1 element2 element3)\n# Access elements\necho ${arr[0]}\n# Get all elements\necho ${arr[@]}",
                0.90,
            ),
            (
                "Check array bounds",
                "# Get array length\nlength=${#arr[@]}\n# Safe access\nif [ $index -lt $length ]; then\n    echo ${arr[$index]}\nfi",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "substring_expansion",
        pattern: r"substring expression",
        severity: Severity::Medium,
        explanation: "Error in substring expansion syntax.",
        suggestions: &[
            (
                "Use correct substring syntax",
                "# Substring expansion\nstr=\"Hello World\"\n# From position 6\necho ${str:6}\n# From position 0, length 5\necho ${str:0:5}",
                0.85,
            ),
            (
                "String manipulation",
                "# Remove prefix\n${var#prefix}\n# Remove suffix\n${var%suffix}\n# Replace\n${var/old/new}",
                0.80,
            ),
        ],
    },
];

const SPECIAL: &[RuleDef] = &[
    RuleDef {
        id: "set_e_error",
        pattern: r"(?:set -e|errexit)",
        severity: Severity::High,
        explanation: "Script exited due to 'set -e' (exit on error) being enabled.",
        suggestions: &[
            (
                "Handle expected failures",
                "# Allow specific command to fail\ncommand_that_might_fail || true\n# Or check return code\nif ! command; then\n    handle_error\nfi",
                0.90,
            ),
            (
                "Use error handling",
                "# Trap errors\ntrap 'echo \"Error on line $LINENO\"' ERR\n# Custom error handler\nerror_handler() {\n    echo \"Error: $1\"\n    exit 1\n}",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "function_not_found",
        pattern: r"(?:function|procedure) not found",
        severity: Severity::High,
        explanation: "Attempting to call an undefined function.",
        suggestions: &[
            (
                "Define function before use",
                "# Function definition\nmy_function() {\n    echo \"Function called\"\n}\n# Call function\nmy_function",
                0.95,
            ),
            (
                "Source function file",
                "# Source external functions\nsource functions.sh\n# Or use dot notation\n. ./functions.sh",
                0.90,
            ),
        ],
    },
];

const SYNTAX: &[RuleDef] = &[
    RuleDef {
        id: "syntax_error",
        pattern: r"(?:syntax error|unexpected token|unexpected end of file)",
        severity: Severity::High,
        explanation: "Shell syntax error detected. Check for missing quotes, brackets, or keywords.",
        suggestions: &[
            (
                "Check syntax structure",
                "#!/bin/bash\n# Correct syntax examples\nif [ \"$var\" = \"value\" ]; then\n    echo \"Match\"\nfi",
                0.85,
            ),
            (
                "Verify quotes and brackets",
                "# Use proper quoting\nvar=\"value with spaces\"\n# Always quote variables\nif [ \"$var\" = \"test\" ]; then",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "command_not_found",
        pattern: r"(?:command not found|No such file or directory)",
        severity: Severity::High,
        explanation: "The specified command or file was not found.",
        suggestions: &[
            (
                "Check if command is installed",
                "# Check if command exists\nwhich command_name\n# Or use command -v\ncommand -v command_name",
                0.90,
            ),
            (
                "Check PATH variable",
                "# View current PATH\necho $PATH\n# Add directory to PATH\nexport PATH=\"$PATH:/new/directory\"",
                0.85,
            ),
            (
                "Use full path to command",
                "# Use absolute path\n/usr/bin/command\n# Or find command location\nwhich command",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "permission_denied",
        pattern: r"(?:Permission denied|Operation not permitted)",
        severity: Severity::High,
        explanation: "Insufficient permissions to execute the command or access the file.",
        suggestions: &[
            (
                "Check file permissions",
                "# View permissions\nls -la file.sh\n# Make script executable\nchmod +x script.sh",
                0.95,
            ),
            (
                "Use sudo if needed",
                "# Run with elevated privileges\nsudo command\n# Or change ownership\nsudo chown user:group file",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "unbound_variable",
        pattern: r"(?:unbound variable|parameter not set)",
        severity: Severity::Medium,
        explanation: "Attempting to use an undefined variable. This often happens with 'set -u' enabled.",
        suggestions: &[
            (
                "Initialize variable",
                "# Set default value\nvar=\"${VAR:-default}\"\n# Or check if set\nif [ -z \"${VAR+x}\" ]; then\n    VAR=\"default\"\nfi",
                0.90,
            ),
            (
                "Use parameter expansion",
                "# Default value if unset\n${var:-default}\n# Default and assign if unset\n${var:=default}",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "bad_substitution",
        pattern: r"bad substitution",
        severity: Severity::High,
        explanation: "Invalid variable substitution syntax.",
        suggestions: &[
            (
                "Check variable syntax",
                "# Correct syntax\n${variable}\n${array[index]}\n${variable:-default}",
                0.85,
            ),
            (
                "Use compatible shell",
                "#!/bin/bash\n# Some features require bash\n# Not available in sh",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "integer_expression_expected",
        pattern: r"integer expression expected",
        severity: Severity::Medium,
        explanation: "A non-integer value was provided where an integer was expected.",
        suggestions: &[
            (
                "Use arithmetic expansion",
                "# For arithmetic operations\nresult=$((num1 + num2))\n# Or use let\nlet \"result = num1 + num2\"",
                0.90,
            ),
            (
                "Validate numeric input",
                "# Check if variable is numeric\nif [[ \"$var\" =~ ^[0-9]+$ ]]; then\n    echo \"Valid number\"\nfi",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "too_many_arguments",
        pattern: r"too many arguments",
        severity: Severity::Medium,
        explanation: "Too many arguments provided to a command or test expression.",
        suggestions: &[
            (
                "Quote variables properly",
                "# Always quote variables in tests\nif [ \"$var\" = \"value with spaces\" ]; then\n    echo \"Match\"\nfi",
                0.95,
            ),
            (
                "Use [[ ]] for complex tests",
                "# Bash extended test\nif [[ $var == pattern* ]]; then\n    echo \"Pattern match\"\nfi",
                0.85,
            ),
        ],
    },
];

/// Script locations; case-sensitive
const TEMPLATES: &[&str] = &[
    r"(?P<file>[^:]+\.sh):(?P<line>\d+):",
    r"(?P<file>[^:]+): line (?P<line>\d+):",
    r"line (?P<line>\d+) of (?P<file>[^:]+)",
    r#""(?P<file>[^"]+)", line (?P<line>\d+)"#,
];

/// Quoted text, then the last colon segment, then the first
const COMMAND: &[&str] = &[
    r"(?m)[`']([^`']+)[`']",
    r"(?m): ([^:]+)$",
    r"(?m)^([^:]+):",
];

pub fn profile() -> Result<DomainProfile, RuleError> {
    let domain = Domain::Shell;

    let mut extractor = ContextExtractor::new();
    for pattern in TEMPLATES {
        extractor = extractor.with_template(ExtractionTemplate::new(pattern)?);
    }
    extractor = extractor.with_capture(FieldCapture::new(
        ExtraField::Command,
        COMMAND,
        Transform::Trim,
    )?);

    Ok(DomainProfile::new(domain)
        .with_group(group(domain, "control", CONTROL)?)
        .with_group(group(domain, "io", IO)?)
        .with_group(group(domain, "array", ARRAY)?)
        .with_group(group(domain, "special", SPECIAL)?)
        .with_group(group(domain, "syntax", SYNTAX)?)
        .with_extractor(extractor)
        .with_fallback(fallback(
            "This appears to be a Shell/Bash error, but doesn't match common patterns.",
            &[
                (
                    "Check shell syntax",
                    "# Verify script syntax\nbash -n script.sh\n# Or use shellcheck\nshellcheck script.sh",
                    0.5,
                ),
                (
                    "Enable debug mode",
                    "# Run with debug output\nbash -x script.sh\n# Or add to script\nset -x",
                    0.5,
                ),
            ],
        )?))
}
