//! SQL databases and ORMs

use super::{fallback, group, RuleDef};
use crate::diagnostic::{ExtraField, Severity};
use crate::domain::Domain;
use crate::extract::{ContextExtractor, ExtractionTemplate, SubtypeDetector};
use crate::profile::DomainProfile;
use crate::rule::RuleError;

// connection comes first so "Access denied for user" is never taken for a
// generic permission or constraint problem
const CONNECTION: &[RuleDef] = &[
    RuleDef {
        id: "connection_refused",
        pattern: r"(?:Connection refused|could not connect|Can't connect to)",
        severity: Severity::Critical,
        explanation: "Cannot establish connection to database server.",
        suggestions: &[
            (
                "Check database server status",
                "# MySQL\nsudo systemctl status mysql\n\n# PostgreSQL\nsudo systemctl status postgresql",
                0.90,
            ),
            (
                "Verify connection parameters",
                "# Test connection\nmysql -h hostname -P port -u username -p\n\n# Or\npsql -h hostname -p port -U username -d database",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "authentication_failed",
        pattern: r"(?:authentication failed|password authentication failed|Access denied for user|access denied.*using password)",
        severity: Severity::Critical,
        explanation: "Authentication failed. Check username and password.",
        suggestions: &[
            (
                "Reset user password",
                "-- MySQL\nALTER USER 'username'@'host' IDENTIFIED BY 'new_password';\n\n-- PostgreSQL\nALTER USER username PASSWORD 'new_password';",
                0.85,
            ),
            (
                "Check user host restrictions",
                "-- MySQL: Check allowed hosts\nSELECT user, host FROM mysql.user WHERE user = 'username';",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "database_not_found",
        pattern: r"(?:database .+ does not exist|Unknown database|FATAL: database)",
        severity: Severity::High,
        explanation: "The specified database does not exist.",
        suggestions: &[
            (
                "Create database",
                "-- Create database\nCREATE DATABASE database_name;\n\n-- With encoding (PostgreSQL)\nCREATE DATABASE database_name ENCODING 'UTF8';",
                0.90,
            ),
            (
                "List available databases",
                "-- MySQL\nSHOW DATABASES;\n\n-- PostgreSQL\n\\l",
                0.85,
            ),
        ],
    },
];

const SYNTAX: &[RuleDef] = &[
    RuleDef {
        id: "syntax_error",
        pattern: r"(?:syntax error|SQL syntax|parse error)",
        severity: Severity::High,
        explanation: "SQL syntax error detected. Check for typos, missing keywords, or incorrect syntax.",
        suggestions: &[
            (
                "Check SQL syntax structure",
                "SELECT column1, column2\nFROM table_name\nWHERE condition;",
                0.85,
            ),
            (
                "Verify quotes and delimiters",
                "-- Use single quotes for strings\nWHERE name = 'value'\n\n-- Use backticks/quotes for identifiers\nSELECT `column name` FROM table",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "missing_column",
        pattern: r"(?:Unknown column|Column .+ (?:does not exist|doesn't exist)|no such column)",
        severity: Severity::High,
        explanation: "The specified column does not exist in the table.",
        suggestions: &[
            (
                "List available columns",
                "-- MySQL/MariaDB\nSHOW COLUMNS FROM table_name;\n\n-- PostgreSQL\n\\d table_name",
                0.90,
            ),
            (
                "Check column name spelling",
                "-- Column names are case-sensitive in some databases",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "missing_table",
        pattern: r"(?:Table .+ (?:does not exist|doesn't exist)|no such table|relation .+ does not exist)",
        severity: Severity::High,
        explanation: "The specified table does not exist in the database.",
        suggestions: &[
            (
                "List available tables",
                "-- MySQL/MariaDB\nSHOW TABLES;\n\n-- PostgreSQL\n\\dt\n\n-- SQLite\n.tables",
                0.90,
            ),
            (
                "Check database/schema context",
                "-- Ensure correct database\nUSE database_name;\n\n-- Or use fully qualified name\nSELECT * FROM database.schema.table;",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "type_mismatch",
        pattern: r"(?:type mismatch|invalid input syntax|cannot convert|data type mismatch)",
        severity: Severity::High,
        explanation: "Data type mismatch between provided value and expected column type.",
        suggestions: &[
            (
                "Use proper type conversion",
                "-- Cast to correct type\nCAST(value AS INTEGER)\nCAST(value AS VARCHAR(255))\nTO_DATE('2025-01-29', 'YYYY-MM-DD')",
                0.90,
            ),
            (
                "Check column data types",
                "-- View table structure\nDESCRIBE table_name;\n\n-- PostgreSQL\n\\d+ table_name",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "constraint_violation",
        pattern: r"(?:constraint|violation|duplicate (?:key|entry)|foreign key|unique constraint|check constraint)",
        severity: Severity::High,
        explanation: "Database constraint violation detected.",
        suggestions: &[
            (
                "Handle duplicate key errors",
                "-- Use INSERT IGNORE (MySQL)\nINSERT IGNORE INTO table VALUES (...);\n\n-- Use ON CONFLICT (PostgreSQL)\nINSERT INTO table VALUES (...)\nON CONFLICT (id) DO NOTHING;",
                0.85,
            ),
            (
                "Check foreign key relationships",
                "-- Ensure parent record exists\nSELECT * FROM parent_table WHERE id = ?;\n\n-- Or disable checks temporarily\nSET foreign_key_checks = 0;",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "permission_denied",
        pattern: r"(?:permission denied|insufficient privileges)",
        severity: Severity::Critical,
        explanation: "User does not have required permissions for this operation.",
        suggestions: &[
            (
                "Grant necessary permissions",
                "-- Grant specific permissions\nGRANT SELECT, INSERT ON database.table TO 'user'@'host';\n\n-- Grant all permissions\nGRANT ALL PRIVILEGES ON database.* TO 'user'@'host';",
                0.90,
            ),
            (
                "Check current permissions",
                "-- MySQL\nSHOW GRANTS FOR CURRENT_USER();\n\n-- PostgreSQL\n\\du",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "deadlock",
        pattern: r"(?:deadlock|lock wait timeout|transaction.*aborted)",
        severity: Severity::Critical,
        explanation: "Database deadlock or lock timeout occurred.",
        suggestions: &[
            (
                "Retry transaction",
                "-- Implement retry logic\nBEGIN;\n-- Your queries here\nCOMMIT;\n-- On deadlock, wait and retry",
                0.85,
            ),
            (
                "Optimize transaction order",
                "-- Access tables in consistent order\n-- Keep transactions short\n-- Use appropriate isolation level\nSET TRANSACTION ISOLATION LEVEL READ COMMITTED;",
                0.80,
            ),
        ],
    },
];

const OPTIMIZATION: &[RuleDef] = &[
    RuleDef {
        id: "slow_query",
        pattern: r"(?:Query execution was interrupted|maximum statement execution time|query timeout)",
        severity: Severity::Medium,
        explanation: "Query is taking too long to execute.",
        suggestions: &[
            (
                "Add indexes for WHERE/JOIN columns",
                "-- Create index\nCREATE INDEX idx_column ON table(column);\n\n-- Composite index\nCREATE INDEX idx_multi ON table(col1, col2);",
                0.90,
            ),
            (
                "Use EXPLAIN to analyze query",
                "-- MySQL\nEXPLAIN SELECT * FROM table WHERE condition;\n\n-- PostgreSQL\nEXPLAIN ANALYZE SELECT * FROM table WHERE condition;",
                0.95,
            ),
        ],
    },
    RuleDef {
        id: "missing_index",
        pattern: r"(?:full table scan|using filesort|using temporary)",
        severity: Severity::Medium,
        explanation: "Query performance could be improved with proper indexing.",
        suggestions: &[
            (
                "Identify missing indexes",
                "-- Check slow query log\n-- Look for queries without index usage\n-- Use performance schema",
                0.85,
            ),
            (
                "Monitor index usage",
                "-- MySQL: Check index usage\nSELECT * FROM sys.schema_unused_indexes;",
                0.80,
            ),
        ],
    },
];

const ORM: &[RuleDef] = &[RuleDef {
    id: "n_plus_one",
    pattern: r"(?:N\+1|multiple queries|lazy loading)",
    severity: Severity::Medium,
    explanation: "N+1 query problem detected. Use eager loading to optimize.",
    suggestions: &[
        (
            "Use JOIN to eager load",
            "-- Instead of multiple queries\nSELECT * FROM posts;\nSELECT * FROM comments WHERE post_id = ?;\n\n-- Use JOIN\nSELECT p.*, c.*\nFROM posts p\nLEFT JOIN comments c ON p.id = c.post_id;",
            0.90,
        ),
        (
            "ORM eager loading examples",
            "# Django\nPost.objects.prefetch_related('comments')\n\n# SQLAlchemy\nsession.query(Post).options(joinedload(Post.comments))",
            0.85,
        ),
    ],
}];

/// Line and position; a position is reported as the column
const TEMPLATES: &[&str] = &[
    r"(?i)line (?P<line>\d+),? (?:column|position) (?P<column>\d+)",
    r"(?P<file>[^\s:]+\.sql):(?P<line>\d+)(?::(?P<column>\d+))?",
    r":(?P<line>\d+):(?P<column>\d+)",
    r"(?i)\bline (?P<line>\d+)",
    r"(?i)\bposition (?P<column>\d+)",
    r"(?i)\bcolumn (?P<column>\d+)",
];

/// Error-code shapes win over product-name indicators
fn dialect_detector() -> Result<SubtypeDetector, RuleError> {
    Ok(SubtypeDetector::new(ExtraField::Dialect)
        .with_signature("mysql", &[r"ERROR \d{4}"])?
        .with_signature("postgresql", &["ERROR:", "LINE"])?
        .with_signature("postgresql", &["FATAL:"])?
        .with_indicators("mysql", &["MySQL", "mysqld", "MyISAM", "InnoDB", "ERROR 1"])
        .with_indicators("postgresql", &["PostgreSQL", "psql", "pg_", "postgres", "relation"])
        .with_indicators("sqlite", &["SQLite", "sqlite3"])
        .with_indicators("mssql", &["SQL Server", "MSSQL", "Transact-SQL"])
        .with_indicators("oracle", &["Oracle", "ORA-", "PL/SQL"]))
}

pub fn profile() -> Result<DomainProfile, RuleError> {
    let domain = Domain::Sql;

    let mut extractor = ContextExtractor::new();
    for pattern in TEMPLATES {
        extractor = extractor.with_template(ExtractionTemplate::new(pattern)?);
    }
    extractor = extractor.with_detector(dialect_detector()?);

    Ok(DomainProfile::new(domain)
        .with_group(group(domain, "connection", CONNECTION)?)
        .with_group(group(domain, "syntax", SYNTAX)?)
        .with_group(group(domain, "optimization", OPTIMIZATION)?)
        .with_group(group(domain, "orm", ORM)?)
        .with_extractor(extractor)
        .with_fallback(fallback(
            "This appears to be a SQL error, but doesn't match common patterns.",
            &[
                (
                    "Run the statement on its own",
                    "-- Reproduce in the database shell\n-- with the exact parameters that failed\nEXPLAIN <statement>;",
                    0.5,
                ),
                (
                    "Look up the error code",
                    "-- MySQL: SHOW ERRORS;\n-- PostgreSQL: \\errverbose\n-- Then search the vendor's error code reference",
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
        engine().analyze(Domain::Sql, text).unwrap().error_type
    }

    #[test]
    fn test_authentication_with_mysql_dialect() {
        let record = engine()
            .analyze(
                Domain::Sql,
                "ERROR 1045: Access denied for user 'root'@'localhost' (using password: YES)",
            )
            .unwrap();
        assert_eq!(record.error_type, "authentication_failed");
        assert_eq!(record.severity, Severity::Critical);
        assert_eq!(record.extra.dialect.as_deref(), Some("mysql"));
    }

    #[test]
    fn test_syntax_group() {
        assert_eq!(
            classify("You have an error in your SQL syntax near 'FORM users'"),
            "syntax_error"
        );
        assert_eq!(
            classify("ERROR 1054: Unknown column 'username' in 'field list'"),
            "missing_column"
        );
        assert_eq!(classify("Table 'database.users' doesn't exist"), "missing_table");
        assert_eq!(
            classify("Duplicate entry 'john@example.com' for key 'email'"),
            "constraint_violation"
        );
        assert_eq!(
            classify("ERROR: permission denied for table invoices"),
            "permission_denied"
        );
        assert_eq!(
            classify("Deadlock found when trying to get lock; try restarting transaction"),
            "deadlock"
        );
    }

    #[test]
    fn test_connection_before_syntax() {
        assert_eq!(
            classify("psql: error: could not connect to server: Connection refused"),
            "connection_refused"
        );
        assert_eq!(
            classify("FATAL: database \"shop\" does not exist"),
            "database_not_found"
        );
    }

    #[test]
    fn test_optimization_and_orm() {
        assert_eq!(
            classify("Query execution was interrupted, maximum statement execution time exceeded"),
            "slow_query"
        );
        assert_eq!(classify("Extra: Using filesort"), "missing_index");
        assert_eq!(classify("Possible N+1 detected on Post.comments"), "n_plus_one");
    }

    #[test]
    fn test_dialect_detection() {
        let engine = engine();
        let dialect = |text: &str| engine.extract(Domain::Sql, text).extra.dialect;

        assert_eq!(
            dialect("ERROR:  relation \"users\" does not exist\nLINE 1: SELECT * FROM users").as_deref(),
            Some("postgresql")
        );
        assert_eq!(dialect("FATAL: role \"app\" does not exist").as_deref(), Some("postgresql"));
        assert_eq!(dialect("sqlite3.OperationalError: no such table: t").as_deref(), Some("sqlite"));
        assert_eq!(dialect("Msg 208, SQL Server: Invalid object name").as_deref(), Some("mssql"));
        assert_eq!(dialect("ORA-00942: table or view does not exist").as_deref(), Some("oracle"));
        assert_eq!(dialect("something failed"), None);
    }

    #[test]
    fn test_line_and_position() {
        let engine = engine();
        let ctx = engine.extract(
            Domain::Sql,
            "ERROR: syntax error at or near \"FORM\" at line 3, position 15",
        );
        assert_eq!(ctx.location.line, Some(3));
        assert_eq!(ctx.location.column, Some(15));

        let ctx = engine.extract(Domain::Sql, "migrations/001_init.sql:12:4: near \"TABEL\"");
        assert_eq!(ctx.location.file.as_deref(), Some("migrations/001_init.sql"));
        assert_eq!(ctx.location.line, Some(12));
        assert_eq!(ctx.location.column, Some(4));

        let ctx = engine.extract(Domain::Sql, "ERROR: oops\nLINE 1: SELECT * FROM users");
        assert_eq!(ctx.location.line, Some(1));
        assert_eq!(ctx.location.column, None);
    }

    #[test]
    fn test_unknown_sql_error() {
        let record = engine().analyze(Domain::Sql, "server has gone away").unwrap();
        assert_eq!(record.error_type, "unknown_sql_error");
        assert_eq!(record.severity, Severity::Medium);
    }
}
