//! Kotlin compiler, runtime, Android and Gradle

use super::{fallback, group, RuleDef};
use crate::diagnostic::Severity;
use crate::domain::Domain;
use crate::extract::{ContextExtractor, ExtractionTemplate};
use crate::profile::DomainProfile;
use crate::rule::RuleError;

const LANGUAGE: &[RuleDef] = &[
    RuleDef {
        id: "null_pointer",
        pattern: r"(?:NullPointerException|NPE|KotlinNullPointerException)",
        severity: Severity::Critical,
        explanation: "Null pointer exception occurred. Despite Kotlin's null safety, this can happen with platform types or !! operator.",
        suggestions: &[
            (
                "Use safe call operator (?.)",
                "object?.method() // Returns null if object is null",
                0.95,
            ),
            (
                "Use Elvis operator (?:)",
                "val result = nullable ?: defaultValue",
                0.90,
            ),
            (
                "Use let with safe call",
                "object?.let { \n    // Use it safely here\n}",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "type_mismatch",
        pattern: r"Type mismatch: inferred type is (.+) but (.+) was expected",
        severity: Severity::High,
        explanation: "Type mismatch error. Kotlin's type system is strict and doesn't allow implicit conversions.",
        suggestions: &[
            (
                "Explicit type conversion",
                "value.toInt() // Convert to Int\nvalue.toString() // Convert to String",
                0.85,
            ),
            (
                "Smart casting",
                "if (value is String) {\n    // value is automatically cast to String here\n}",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "unresolved_reference",
        pattern: r"Unresolved reference: (.+)",
        severity: Severity::High,
        explanation: "The referenced identifier cannot be found in the current scope.",
        suggestions: &[
            ("Check imports", "import package.name.ClassName", 0.85),
            ("Check spelling and case", "// Kotlin is case-sensitive", 0.80),
            (
                "Check scope and visibility",
                "// Ensure the member is public or internal",
                0.75,
            ),
        ],
    },
    RuleDef {
        id: "class_cast",
        pattern: r"ClassCastException: .+ cannot be cast to (.+)",
        severity: Severity::Critical,
        explanation: "Attempting to cast an object to an incompatible type.",
        suggestions: &[
            (
                "Use safe cast (as?)",
                "val result = value as? TargetType // Returns null if cast fails",
                0.95,
            ),
            (
                "Check type before casting",
                "if (value is TargetType) {\n    val casted = value // Smart cast\n}",
                0.90,
            ),
        ],
    },
    RuleDef {
        id: "coroutine_exception",
        pattern: r"(?:CoroutineException|Job was cancelled|coroutine)",
        severity: Severity::High,
        explanation: "Exception in Kotlin coroutine. This often happens with improper exception handling in async code.",
        suggestions: &[
            (
                "Use CoroutineExceptionHandler",
                "val handler = CoroutineExceptionHandler { _, exception ->\n    println(\"Caught $exception\")\n}",
                0.90,
            ),
            (
                "Use try-catch in coroutine",
                "launch {\n    try {\n        // Coroutine code\n    } catch (e: Exception) {\n        // Handle exception\n    }\n}",
                0.85,
            ),
            (
                "Use supervisorScope",
                "supervisorScope {\n    // Child failure won't cancel parent\n}",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "lateinit_not_initialized",
        pattern: r"UninitializedPropertyAccessException: lateinit property (.+) has not been initialized",
        severity: Severity::High,
        explanation: "Accessing a lateinit property before it has been initialized.",
        suggestions: &[
            (
                "Check if initialized",
                "if (::property.isInitialized) {\n    // Use property safely\n}",
                0.95,
            ),
            (
                "Initialize in init block",
                "init {\n    property = InitialValue()\n}",
                0.90,
            ),
            (
                "Use nullable type instead",
                "private var property: Type? = null",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "no_such_element",
        pattern: r"NoSuchElementException",
        severity: Severity::High,
        explanation: "Attempting to access an element that doesn't exist in a collection.",
        suggestions: &[
            (
                "Use safe access methods",
                "list.firstOrNull() // Returns null if empty\nlist.getOrNull(index) // Returns null if out of bounds",
                0.95,
            ),
            (
                "Check collection before access",
                "if (list.isNotEmpty()) {\n    val first = list.first()\n}",
                0.90,
            ),
        ],
    },
    RuleDef {
        id: "illegal_argument",
        pattern: r"IllegalArgumentException: (.+)",
        severity: Severity::High,
        explanation: "Invalid argument passed to a function.",
        suggestions: &[
            (
                "Use require() for validation",
                "fun process(value: Int) {\n    require(value > 0) { \"Value must be positive\" }\n}",
                0.90,
            ),
            (
                "Use check() for state validation",
                "check(isInitialized) { \"Must be initialized first\" }",
                0.85,
            ),
        ],
    },
];

const ANDROID: &[RuleDef] = &[
    RuleDef {
        id: "activity_not_found",
        pattern: r"ActivityNotFoundException",
        severity: Severity::High,
        explanation: "The specified Activity cannot be found. Check your AndroidManifest.xml.",
        suggestions: &[
            (
                "Declare Activity in manifest",
                "<activity android:name=\".YourActivity\" />",
                0.90,
            ),
            (
                "Check Intent action",
                "if (intent.resolveActivity(packageManager) != null) {\n    startActivity(intent)\n}",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "network_on_main_thread",
        pattern: r"NetworkOnMainThreadException",
        severity: Severity::Critical,
        explanation: "Network operations cannot be performed on the main thread in Android.",
        suggestions: &[
            (
                "Use coroutines with IO dispatcher",
                "lifecycleScope.launch(Dispatchers.IO) {\n    // Network operation\n}",
                0.95,
            ),
            (
                "Use suspend function",
                "suspend fun fetchData() = withContext(Dispatchers.IO) {\n    // Network call\n}",
                0.90,
            ),
        ],
    },
    RuleDef {
        id: "view_binding_null",
        pattern: r"(?:findViewById|binding\.) .+ must not be null",
        severity: Severity::High,
        explanation: "View binding returned null. The view might not be inflated yet.",
        suggestions: &[
            (
                "Use View Binding correctly",
                "private var _binding: FragmentBinding? = null\nprivate val binding get() = _binding!!",
                0.90,
            ),
            (
                "Access views after onViewCreated",
                "override fun onViewCreated(view: View, savedInstanceState: Bundle?) {\n    // Safe to access views here\n}",
                0.85,
            ),
        ],
    },
];

const GRADLE: &[RuleDef] = &[
    RuleDef {
        id: "unresolved_dependency",
        pattern: r"Could not resolve (.+)",
        severity: Severity::High,
        explanation: "Gradle cannot resolve the specified dependency.",
        suggestions: &[
            (
                "Check dependency notation",
                "implementation \"group:artifact:version\"",
                0.85,
            ),
            (
                "Add repository",
                "repositories {\n    mavenCentral()\n    google()\n}",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "duplicate_class",
        pattern: r"Duplicate class (.+) found",
        severity: Severity::High,
        explanation: "Duplicate classes found in dependencies.",
        suggestions: &[
            (
                "Exclude duplicate module",
                "implementation(\"dependency\") {\n    exclude group: \"conflicting.group\"\n}",
                0.85,
            ),
            (
                "Use resolution strategy",
                "configurations.all {\n    resolutionStrategy {\n        force \"group:artifact:version\"\n    }\n}",
                0.80,
            ),
        ],
    },
];

/// kotlinc `F:L:C`, stack frames `(F:L)`, then the older `F: (L, C)` form
const TEMPLATES: &[&str] = &[
    r"(?P<file>[^\s(]+\.kts?):(?P<line>\d+):(?P<column>\d+)",
    r"(?P<file>[^\s(]+\.kts?):(?P<line>\d+)",
    r"(?P<file>[^\s(]+\.kts?): \((?P<line>\d+), (?P<column>\d+)\)",
];

pub fn profile() -> Result<DomainProfile, RuleError> {
    let domain = Domain::Kotlin;

    let mut extractor = ContextExtractor::new();
    for pattern in TEMPLATES {
        extractor = extractor.with_template(ExtractionTemplate::new(pattern)?);
    }

    Ok(DomainProfile::new(domain)
        .with_group(group(domain, "language", LANGUAGE)?)
        .with_group(group(domain, "android", ANDROID)?)
        .with_group(group(domain, "gradle", GRADLE)?)
        .with_extractor(extractor)
        .with_fallback(fallback(
            "This appears to be a Kotlin error, but doesn't match common patterns.",
            &[
                (
                    "Read the full stack trace",
                    "// Look for the first \"Caused by:\" line\n// and the topmost frame from your own package",
                    0.5,
                ),
                (
                    "Clean and rebuild",
                    "./gradlew clean build --stacktrace",
                    0.5,
                ),
            ],
        )?))
}
