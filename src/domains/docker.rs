//! Dockerfile builds, docker CLI and compose

use super::{fallback, group, RuleDef};
use crate::diagnostic::{ExtraField, Severity};
use crate::domain::Domain;
use crate::extract::{ContextExtractor, ExtractionTemplate, FieldCapture, Transform};
use crate::profile::DomainProfile;
use crate::rule::RuleError;

// invalid_from sits ahead of missing_argument so "FROM requires one argument"
// is reported as an image reference problem
const DOCKERFILE: &[RuleDef] = &[
    RuleDef {
        id: "invalid_instruction",
        pattern: r"(?:Unknown instruction|Invalid instruction|unknown flag)",
        severity: Severity::High,
        explanation: "Invalid or misspelled Dockerfile instruction.",
        suggestions: &[
            (
                "Check Dockerfile syntax",
                "# Valid Dockerfile instructions\nFROM image:tag\nRUN command\nCOPY source dest\nWORKDIR /path\nEXPOSE port\nCMD [\"executable\"]",
                0.90,
            ),
            (
                "Use uppercase for instructions",
                "# Instructions must be uppercase\nFROM ubuntu:latest  # Correct\nfrom ubuntu:latest  # Incorrect",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "invalid_from",
        pattern: r"(?:invalid reference format|repository name must be lowercase|FROM requires (?:one|exactly one) argument)",
        severity: Severity::High,
        explanation: "Invalid FROM instruction or image reference.",
        suggestions: &[
            (
                "Use valid image reference",
                "# Valid FROM formats\nFROM ubuntu:20.04\nFROM node:16-alpine\nFROM registry.com/namespace/image:tag",
                0.95,
            ),
            (
                "Use lowercase for image names",
                "# Image names must be lowercase\nFROM ubuntu:latest     # Correct\nFROM Ubuntu:latest     # Incorrect",
                0.90,
            ),
        ],
    },
    RuleDef {
        id: "copy_failed",
        pattern: r"(?:COPY failed|failed to compute cache key|no such file or directory)",
        severity: Severity::High,
        explanation: "COPY or ADD instruction failed, usually due to missing source files.",
        suggestions: &[
            (
                "Check source file exists",
                "# Ensure files exist in build context\n# Build context is usually current directory\ndocker build -t myimage .\n\n# Files must be within build context",
                0.90,
            ),
            (
                "Use .dockerignore",
                "# Create .dockerignore to exclude files\nnode_modules/\n.git/\n*.log\n.env",
                0.85,
            ),
            (
                "Check file paths",
                "# Use relative paths from build context\nCOPY ./src /app/src\n# Not absolute paths\nCOPY /home/user/src /app/src  # Wrong",
                0.80,
            ),
        ],
    },
    RuleDef {
        id: "run_failed",
        pattern: r"(?:The command .+ returned a non-zero code|executor failed running)",
        severity: Severity::High,
        explanation: "RUN instruction failed during build.",
        suggestions: &[
            (
                "Check command syntax",
                "# Combine commands to reduce layers\nRUN apt-get update && \\\n    apt-get install -y package && \\\n    apt-get clean",
                0.85,
            ),
            (
                "Handle non-interactive mode",
                "# Set non-interactive for apt\nENV DEBIAN_FRONTEND=noninteractive\nRUN apt-get update && apt-get install -y package",
                0.80,
            ),
            (
                "Check package availability",
                "# Update package lists first\nRUN apt-get update && apt-get install -y package\n# For Alpine\nRUN apk update && apk add package",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "missing_argument",
        pattern: r"(?:requires at least \d+ argument|COPY requires at least|not enough arguments in call)",
        severity: Severity::High,
        explanation: "Dockerfile instruction is missing required arguments.",
        suggestions: &[
            (
                "Provide required arguments",
                "# Examples of correct usage\nFROM ubuntu:20.04\nCOPY source.txt /dest/\nRUN apt-get update\nEXPOSE 8080",
                0.90,
            ),
            (
                "Check instruction syntax",
                "# Common instruction formats\nCOPY <src> <dest>\nADD <src> <dest>\nENV <key>=<value>\nLABEL <key>=<value>",
                0.85,
            ),
        ],
    },
];

const COMPOSE: &[RuleDef] = &[
    RuleDef {
        id: "invalid_compose_file",
        pattern: r"(?:yaml|yml|ERROR: yaml).*(?:scanner|parser|found character|mapping values|did not find expected)",
        severity: Severity::High,
        explanation: "Invalid YAML syntax in docker-compose file.",
        suggestions: &[
            (
                "Check YAML syntax",
                "# Validate docker-compose file\ndocker-compose config\n\n# Common YAML rules:\n# - Use spaces, not tabs\n# - Consistent indentation\n# - Proper quoting",
                0.90,
            ),
            (
                "Fix indentation",
                "version: \"3.8\"\nservices:\n  web:              # 2 spaces\n    image: nginx    # 4 spaces\n    ports:\n      - \"80:80\"     # 6 spaces",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "service_not_found",
        pattern: r"(?:No such service|Service .+ was not found)",
        severity: Severity::Medium,
        explanation: "The specified service is not defined in docker-compose.yml.",
        suggestions: &[
            (
                "List available services",
                "# List all services\ndocker-compose ps\n\n# Check service names in compose file\ndocker-compose config --services",
                0.90,
            ),
            (
                "Use correct service name",
                "# Execute command in service\ndocker-compose exec service_name command\n\n# View logs for service\ndocker-compose logs service_name",
                0.85,
            ),
        ],
    },
];

const NETWORK: &[RuleDef] = &[
    RuleDef {
        id: "network_not_found",
        pattern: r"(?:network .+ not found|Error response from daemon: network)",
        severity: Severity::Medium,
        explanation: "The specified Docker network does not exist.",
        suggestions: &[
            (
                "Create network",
                "# Create a network\ndocker network create mynetwork\n\n# List networks\ndocker network ls",
                0.90,
            ),
            (
                "Use existing network",
                "# Connect container to network\ndocker run --network mynetwork image\n\n# Or use default bridge\ndocker run image",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "volume_not_found",
        pattern: r"(?:volume .+ not found|no such volume)",
        severity: Severity::Medium,
        explanation: "The specified Docker volume does not exist.",
        suggestions: &[
            (
                "Create volume",
                "# Create a volume\ndocker volume create myvolume\n\n# List volumes\ndocker volume ls",
                0.90,
            ),
            (
                "Use bind mount instead",
                "# Use bind mount\ndocker run -v /host/path:/container/path image\n\n# Or anonymous volume\ndocker run -v /container/path image",
                0.85,
            ),
        ],
    },
];

const RUNTIME: &[RuleDef] = &[
    RuleDef {
        id: "container_not_found",
        pattern: r"(?:No such container|container .+ not found|Could not find container)",
        severity: Severity::Medium,
        explanation: "The specified container does not exist.",
        suggestions: &[
            (
                "List running containers",
                "# List all running containers\ndocker ps\n\n# List all containers (including stopped)\ndocker ps -a",
                0.90,
            ),
            (
                "Use container name or ID",
                "# Use container name\ndocker exec -it container_name bash\n\n# Or use container ID\ndocker exec -it abc123def456 bash",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "image_not_found",
        pattern: r"(?:Unable to find image|pull access denied|repository does not exist|repository .+ not found)",
        severity: Severity::High,
        explanation: "Docker cannot find or pull the specified image.",
        suggestions: &[
            (
                "Check image name",
                "# Verify image name and tag\ndocker pull ubuntu:20.04\n\n# List local images\ndocker images",
                0.90,
            ),
            (
                "Login to registry",
                "# Login if using private registry\ndocker login registry.example.com\n\n# For Docker Hub\ndocker login",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "port_already_allocated",
        pattern: r"(?:bind: address already in use|port is already allocated)",
        severity: Severity::Medium,
        explanation: "The specified port is already in use by another process.",
        suggestions: &[
            (
                "Use different port",
                "# Map to different host port\ndocker run -p 8081:80 image\n\n# Or let Docker choose\ndocker run -P image",
                0.95,
            ),
            (
                "Find process using port",
                "# Find what's using the port\nlsof -i :8080\n# Or\nnetstat -tulpn | grep 8080",
                0.85,
            ),
        ],
    },
    RuleDef {
        id: "permission_denied",
        pattern: r"(?:Permission denied|Got permission denied|access denied)",
        severity: Severity::High,
        explanation: "Permission denied error, often related to Docker daemon access.",
        suggestions: &[
            (
                "Add user to docker group",
                "# Add current user to docker group\nsudo usermod -aG docker $USER\n\n# Then logout and login again",
                0.90,
            ),
            (
                "Use sudo (temporary)",
                "# Run with sudo\nsudo docker ps\n\n# Not recommended for regular use",
                0.70,
            ),
        ],
    },
    RuleDef {
        id: "out_of_space",
        pattern: r"(?:no space left on device|disk quota exceeded)",
        severity: Severity::Critical,
        explanation: "Docker has run out of disk space.",
        suggestions: &[
            (
                "Clean up Docker resources",
                "# Remove unused containers, images, volumes\ndocker system prune -a\n\n# Remove volumes too\ndocker system prune -a --volumes",
                0.95,
            ),
            (
                "Check disk usage",
                "# Check Docker disk usage\ndocker system df\n\n# Check overall disk space\ndf -h",
                0.90,
            ),
        ],
    },
];

const INSTRUCTION: &str = r"(?i)\b(FROM|RUN|CMD|LABEL|MAINTAINER|EXPOSE|ENV|ADD|COPY|ENTRYPOINT|VOLUME|USER|WORKDIR|ARG|ONBUILD|STOPSIGNAL|HEALTHCHECK|SHELL)\b";

pub fn profile() -> Result<DomainProfile, RuleError> {
    let domain = Domain::Docker;

    let extractor = ContextExtractor::new()
        .with_template(
            ExtractionTemplate::new(r"(?i)dockerfile:(?P<line>\d+)")?.with_fixed_file("Dockerfile"),
        )
        .with_template(
            ExtractionTemplate::new(r"(?i)line (?P<line>\d+): .+ \(Dockerfile\)")?
                .with_fixed_file("Dockerfile"),
        )
        .with_template(ExtractionTemplate::new(
            r#"(?i)"(?P<file>[^"]+Dockerfile[^"]*)" at line (?P<line>\d+)"#,
        )?)
        .with_capture(FieldCapture::new(
            ExtraField::Instruction,
            &[INSTRUCTION],
            Transform::Uppercase,
        )?);

    Ok(DomainProfile::new(domain)
        .with_group(group(domain, "dockerfile", DOCKERFILE)?)
        .with_group(group(domain, "compose", COMPOSE)?)
        .with_group(group(domain, "network", NETWORK)?)
        .with_group(group(domain, "runtime", RUNTIME)?)
        .with_extractor(extractor)
        .with_fallback(fallback(
            "This appears to be a Docker error, but doesn't match common patterns.",
            &[
                (
                    "Check Docker documentation",
                    "# Verify Docker command syntax\ndocker --help\ndocker COMMAND --help",
                    0.5,
                ),
                (
                    "Enable debug logging",
                    "# Run with debug output\ndocker --debug COMMAND\n\n# Or set environment variable\nexport DOCKER_BUILDKIT=1",
                    0.5,
                ),
            ],
        )?))
}
