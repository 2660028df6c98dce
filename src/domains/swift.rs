//! Swift runtime, compiler and Xcode

use super::{fallback, group, RuleDef};
use crate::diagnostic::Severity;
use crate::domain::Domain;
use crate::extract::{ContextExtractor, ExtractionTemplate};
use crate::profile::DomainProfile;
use crate::rule::RuleError;

const LANGUAGE: &[RuleDef] = &[
    RuleDef {
        id: "nil_unwrap",
        pattern: r"Fatal error: Unexpectedly found nil while (?:implicitly )?unwrapping an Optional value",
        severity: Severity::Critical,
        explanation: "You're trying to force unwrap an optional that contains nil. This is one of the most common Swift runtime errors.",
        suggestions: &[
            (
                "Use optional binding (if let)",
                "if let value = optionalValue {\n    // Use value safely\n}",
                0.95,
            ),
            (
                "Use nil-coalescing operator (??)",
                "let value = optionalValue ?? defaultValue",
                0.90,
            ),
            (
                "Use guard statement",
                "guard let value = optionalValue else { return }",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "type_mismatch",
        pattern: r"Cannot convert value of type '(.+)' to expected argument type '(.+)'",
        severity: Severity::High,
        explanation: "Type mismatch error. Swift's type system is strict and doesn't allow implicit conversions.",
        suggestions: &[
            (
                "Explicit type casting",
                "as? TargetType // Safe casting\nas! TargetType // Force casting (use carefully)",
                0.85,
            ),
            (
                "Check type compatibility",
                "if let converted = value as? TargetType {\n    // Use converted value\n}",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "array_bounds",
        pattern: r"Fatal error: Index out of range",
        severity: Severity::Critical,
        explanation: "Attempting to access an array element at an index that doesn't exist.",
        suggestions: &[
            (
                "Check array bounds",
                "if index < array.count {\n    let element = array[index]\n}",
                0.95,
            ),
            (
                "Use safe subscript",
                "array.indices.contains(index) ? array[index] : nil",
                0.90,
            ),
            (
                "Use first/last properties",
                "array.first // Safe access to first element\narray.last  // Safe access to last element",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "protocol_conformance",
        pattern: r"Type '(.+)' does not conform to protocol '(.+)'",
        severity: Severity::High,
        explanation: "The type doesn't implement all required methods/properties of the protocol.",
        suggestions: &[
            (
                "Implement required protocol methods",
                "extension YourType: ProtocolName {\n    // Implement required methods\n}",
                0.90,
            ),
            (
                "Check protocol requirements",
                "// Add missing methods/properties required by the protocol",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "memory_access",
        pattern: r"Simultaneous accesses to .+, but modification requires exclusive access",
        severity: Severity::Critical,
        explanation: "Swift's memory safety prevents simultaneous access to the same memory location.",
        suggestions: &[
            (
                "Use temporary variable",
                "let temp = value\n// Modify temp instead of original",
                0.85,
            ),
            (
                "Restructure code to avoid simultaneous access",
                "// Separate read and write operations",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "swiftui_state",
        pattern: r"Accessing State's value outside of being installed on a View",
        severity: Severity::High,
        explanation: "SwiftUI @State can only be accessed within the view's body or methods called from body.",
        suggestions: &[
            (
                "Access @State in View body",
                "var body: some View {\n    Text(stateVariable) // Access here\n}",
                0.90,
            ),
            (
                "Use @Binding for child views",
                "@Binding var value: String // In child view",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "async_await",
        pattern: r"'async' call in a function that does not support concurrency",
        severity: Severity::High,
        explanation: "Async functions must be called from async contexts.",
        suggestions: &[
            (
                "Use Task to call async function",
                "Task {\n    await asyncFunction()\n}",
                0.95,
            ),
            (
                "Make calling function async",
                "func yourFunction() async {\n    await asyncFunction()\n}",
                0.90,
            ),
        ],
    },
];

const XCODE: &[RuleDef] = &[
    RuleDef {
        id: "module_not_found",
        pattern: r"No such module '(.+)'",
        severity: Severity::High,
        explanation: "The specified module/framework cannot be found.",
        suggestions: &[
            (
                "Check package dependencies",
                "// In Package.swift or Xcode project settings",
                0.85,
            ),
            (
                "Import correct module name",
                "import ModuleName // Check spelling and case",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "linker_error",
        pattern: r"Undefined symbols for architecture",
        severity: Severity::Critical,
        explanation: "Linker cannot find the implementation of referenced symbols.",
        suggestions: &[
            (
                "Add missing framework",
                "// Add framework in Build Phases > Link Binary With Libraries",
                0.85,
            ),
            (
                "Check target membership",
                "// Ensure files are included in correct target",
                0.80,
            ),
        ],
    },
];

const TEMPLATES: &[&str] = &[
    r"(?P<file>[^\s]+\.swift):(?P<line>\d+):(?P<column>\d+)",
    r"(?P<file>[^\s]+\.swift):(?P<line>\d+)",
    // runtime traps: "file App/Model.swift, line 42"
    r"file (?P<file>[^\s,]+\.swift), line (?P<line>\d+)",
];

pub fn profile() -> Result<DomainProfile, RuleError> {
    let domain = Domain::Swift;

    let mut extractor = ContextExtractor::new();
    for pattern in TEMPLATES {
        extractor = extractor.with_template(ExtractionTemplate::new(pattern)?);
    }

    Ok(DomainProfile::new(domain)
        .with_group(group(domain, "language", LANGUAGE)?)
        .with_group(group(domain, "xcode", XCODE)?)
        .with_extractor(extractor)
        .with_fallback(fallback(
            "This appears to be a Swift error, but doesn't match common patterns.",
            &[
                (
                    "Clean the build folder",
                    "// Xcode: Product > Clean Build Folder (Shift+Cmd+K)\n// SwiftPM: swift package clean",
                    0.5,
                ),
                (
                    "Check the full compiler log",
                    "// Report navigator (Cmd+9) shows the complete build transcript\nswift build -v",
                    0.5,
                ),
            ],
        )?))
}
