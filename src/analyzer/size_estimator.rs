//! Heuristic final-image size estimation.
//!
//! Figures are coarse rules of thumb keyed on base image names and on
//! substrings of the raw argument text. They are meant to rank ideas, not to
//! predict real image sizes.

use crate::analyzer::parser::{Directive, Instruction, ParseResult, strip_image_tag};
use crate::analyzer::rules::commands::{
    PackageManager, has_cleanup, install_arguments, install_managers,
};
use serde::Serialize;

/// Approximate uncompressed sizes (MB) of common official images, default tag.
const BASE_IMAGE_SIZES: &[(&str, f64)] = &[
    ("scratch", 0.0),
    ("busybox", 4.5),
    ("alpine", 7.5),
    ("distroless", 20.0),
    ("ubuntu", 78.0),
    ("debian", 117.0),
    ("amazonlinux", 140.0),
    ("httpd", 150.0),
    ("redis", 130.0),
    ("nginx", 190.0),
    ("fedora", 190.0),
    ("centos", 230.0),
    ("postgres", 420.0),
    ("openjdk", 470.0),
    ("eclipse-temurin", 400.0),
    ("php", 480.0),
    ("mysql", 560.0),
    ("golang", 800.0),
    ("ruby", 900.0),
    ("node", 1000.0),
    ("python", 1000.0),
    ("rust", 1400.0),
];

const UNKNOWN_BASE_MB: f64 = 100.0;

/// One instruction's estimated contribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeContribution {
    pub line: u32,
    pub label: String,
    pub mb: f64,
}

/// Estimated final image size with recommendations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeEstimate {
    /// Final-stage base image as written.
    pub base_image: String,
    pub base_mb: f64,
    pub estimated_mb: f64,
    pub breakdown: Vec<SizeContribution>,
    pub recommendations: Vec<String>,
}

fn is_small_variant(image: &str) -> bool {
    ["alpine", "slim", "distroless", "scratch", "busybox", "minimal"]
        .iter()
        .any(|v| image.contains(v))
}

/// Estimate the size of a base image reference.
pub fn base_image_mb(image: &str) -> f64 {
    if image.is_empty() {
        return 0.0;
    }
    if image.contains("distroless") {
        return 20.0;
    }

    let name = strip_image_tag(image);
    let short = name.rsplit('/').next().unwrap_or(name);
    let size = BASE_IMAGE_SIZES
        .iter()
        .find(|(known, _)| *known == short)
        .map(|(_, mb)| *mb)
        .unwrap_or(UNKNOWN_BASE_MB);

    let tag = &image[name.len()..];
    if tag.contains("alpine") {
        (size * 0.15).max(7.5)
    } else if tag.contains("slim") {
        size * 0.35
    } else {
        size
    }
}

fn package_count(cmd: &str) -> usize {
    install_arguments(cmd).len()
}

fn run_contribution(instr: &Instruction) -> Option<(String, f64)> {
    let cmd = &instr.args_text;
    let managers = install_managers(cmd);
    let manager = *managers.first()?;
    let packages = package_count(cmd).max(1) as f64;

    let mut mb = match manager {
        PackageManager::Apt | PackageManager::Yum => 25.0 + 10.0 * packages,
        PackageManager::Apk => 2.0 + 5.0 * packages,
        PackageManager::Npm => {
            if cmd.contains("--production") || cmd.contains("--omit=dev") {
                80.0
            } else {
                150.0
            }
        }
        PackageManager::Pip => {
            if cmd.contains(" -r ") {
                80.0
            } else {
                15.0 * packages
            }
        }
    };
    if has_cleanup(cmd) {
        mb *= 0.7;
    }
    Some((format!("{} install", manager.command()), mb))
}

fn copy_contribution(instr: &Instruction) -> (String, f64) {
    if instr.args_text.contains("node_modules") {
        ("node_modules copied".to_string(), 200.0)
    } else if instr.copies_whole_context() {
        ("build context".to_string(), 20.0)
    } else if instr.has_flag("--from") {
        ("artifacts from another stage".to_string(), 30.0)
    } else {
        ("files".to_string(), 1.0)
    }
}

/// Estimate the final image size from the last stage.
pub fn estimate(result: &ParseResult) -> SizeEstimate {
    let Some(stage) = result.final_stage() else {
        return SizeEstimate {
            base_image: String::new(),
            base_mb: 0.0,
            estimated_mb: 0.0,
            breakdown: Vec::new(),
            recommendations: Vec::new(),
        };
    };
    let instructions = result.stage_instructions(stage);
    let base_mb = base_image_mb(&stage.base_image);

    let mut breakdown = Vec::new();
    for instr in instructions {
        let contribution = match instr.directive {
            Directive::Run => run_contribution(instr),
            Directive::Copy | Directive::Add => Some(copy_contribution(instr)),
            _ => None,
        };
        if let Some((label, mb)) = contribution {
            breakdown.push(SizeContribution {
                line: instr.line,
                label,
                mb,
            });
        }
    }

    let estimated_mb = base_mb + breakdown.iter().map(|c| c.mb).sum::<f64>();
    let recommendations = recommendations(result, instructions, &stage.base_image, base_mb, estimated_mb);

    SizeEstimate {
        base_image: stage.base_image.clone(),
        base_mb,
        estimated_mb,
        breakdown,
        recommendations,
    }
}

fn recommendations(
    result: &ParseResult,
    instructions: &[Instruction],
    base_image: &str,
    base_mb: f64,
    estimated_mb: f64,
) -> Vec<String> {
    let mut recs = Vec::new();

    if base_mb > 100.0 && !is_small_variant(base_image) {
        recs.push(format!(
            "`{}` is a full image; a slim or alpine variant is usually several hundred MB smaller.",
            base_image
        ));
    }
    if instructions.iter().any(|i| i.args_text.contains("node_modules")) {
        recs.push(
            "node_modules is copied from the build context; add it to .dockerignore and install inside the image."
                .to_string(),
        );
    }
    let dev_install = instructions.iter().any(|i| {
        i.is(Directive::Run)
            && (i.args_text.contains("npm install") || i.args_text.contains("npm ci"))
            && !i.args_text.contains("--production")
            && !i.args_text.contains("--omit=dev")
    });
    if dev_install {
        recs.push("Install only production dependencies in the final image (`npm ci --omit=dev`).".to_string());
    }
    let apt_recommends = instructions.iter().any(|i| {
        i.is(Directive::Run)
            && install_managers(&i.args_text).contains(&PackageManager::Apt)
            && !i.args_text.contains("--no-install-recommends")
    });
    if apt_recommends {
        recs.push("Pass `--no-install-recommends` to apt-get install to skip optional packages.".to_string());
    }
    if !result.multi_stage && estimated_mb > 300.0 {
        recs.push(
            "Use a multi-stage build so build-time dependencies stay out of the final image.".to_string(),
        );
    }

    recs
}
