use crate::model::RuleContext;
use edgeguard_types::{Detection, Issue, Severity, ids};

/// Known heavy package, its rough bundled size and a lighter alternative.
struct HeavyDependency {
    name: &'static str,
    bytes: u64,
    alternative: &'static str,
}

/// Package that cannot run in the edge runtime.
struct IncompatibleDependency {
    name: &'static str,
    reason: &'static str,
    alternative: &'static str,
}

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

const HEAVY_DEPENDENCIES: &[HeavyDependency] = &[
    HeavyDependency {
        name: "aws-sdk",
        bytes: 3 * MIB + 512 * KIB,
        alternative: "aws4fetch",
    },
    HeavyDependency {
        name: "googleapis",
        bytes: 6 * MIB,
        alternative: "direct REST calls with fetch",
    },
    HeavyDependency {
        name: "@aws-sdk/client-s3",
        bytes: MIB,
        alternative: "aws4fetch (R2 is S3-compatible)",
    },
    HeavyDependency {
        name: "lodash",
        bytes: 540 * KIB,
        alternative: "lodash-es per-function imports or native methods",
    },
    HeavyDependency {
        name: "moment",
        bytes: 290 * KIB,
        alternative: "dayjs or date-fns",
    },
    HeavyDependency {
        name: "moment-timezone",
        bytes: 900 * KIB,
        alternative: "Intl.DateTimeFormat or date-fns-tz",
    },
    HeavyDependency {
        name: "axios",
        bytes: 60 * KIB,
        alternative: "native fetch",
    },
];

const INCOMPATIBLE_DEPENDENCIES: &[IncompatibleDependency] = &[
    IncompatibleDependency {
        name: "sharp",
        reason: "native libvips bindings",
        alternative: "Cloudflare Images or @cf-wasm/photon",
    },
    IncompatibleDependency {
        name: "bcrypt",
        reason: "native bindings",
        alternative: "bcryptjs or Web Crypto PBKDF2",
    },
    IncompatibleDependency {
        name: "argon2",
        reason: "native bindings",
        alternative: "Web Crypto PBKDF2",
    },
    IncompatibleDependency {
        name: "canvas",
        reason: "native cairo bindings",
        alternative: "a WASM image library",
    },
    IncompatibleDependency {
        name: "better-sqlite3",
        reason: "native SQLite bindings",
        alternative: "D1",
    },
    IncompatibleDependency {
        name: "sqlite3",
        reason: "native SQLite bindings",
        alternative: "D1",
    },
    IncompatibleDependency {
        name: "pg-native",
        reason: "native libpq bindings",
        alternative: "pg with nodejs_compat, or Hyperdrive",
    },
    IncompatibleDependency {
        name: "puppeteer",
        reason: "downloads and spawns Chromium",
        alternative: "@cloudflare/puppeteer (Browser Rendering)",
    },
    IncompatibleDependency {
        name: "playwright",
        reason: "spawns browser processes",
        alternative: "@cloudflare/playwright (Browser Rendering)",
    },
    IncompatibleDependency {
        name: "node-sass",
        reason: "native libsass bindings",
        alternative: "sass at build time",
    },
    IncompatibleDependency {
        name: "jsdom",
        reason: "relies on Node-only modules",
        alternative: "linkedom or HTMLRewriter",
    },
    IncompatibleDependency {
        name: "@grpc/grpc-js",
        reason: "needs raw HTTP/2 sockets",
        alternative: "a fetch-based gRPC-web client",
    },
];

pub fn run(ctx: &RuleContext<'_>) -> Vec<Issue> {
    let mut out = Vec::new();

    let deps: Vec<&str> = ctx
        .package
        .map(|p| p.dependencies.iter().map(String::as_str).collect())
        .unwrap_or_default();

    if ctx.sources.is_some() || ctx.package.is_some() {
        let source_bytes = ctx.sources.map_or(0, |s| s.production_bytes());
        let dep_bytes: u64 = HEAVY_DEPENDENCIES
            .iter()
            .filter(|h| deps.contains(&h.name))
            .map(|h| h.bytes)
            .sum();
        let estimate = source_bytes + dep_bytes;

        let over = if estimate > ctx.limits.paid_bundle_bytes {
            Some((Severity::Critical, "paid", ctx.limits.paid_bundle_bytes))
        } else if estimate > ctx.limits.free_bundle_bytes {
            Some((Severity::Medium, "free", ctx.limits.free_bundle_bytes))
        } else {
            None
        };
        if let Some((severity, plan, ceiling)) = over {
            out.push(
                Issue::new(
                    ids::BUNDLE001,
                    severity,
                    Detection::Heuristic,
                    format!(
                        "Estimated bundle {} exceeds the {plan} plan limit of {}",
                        mib(estimate),
                        mib(ceiling)
                    ),
                    "Trim or lazy-load heavy dependencies; split the worker if needed",
                )
                .with_verify("Run: wrangler deploy --dry-run --outdir dist and check the reported size"),
            );
        }
    }

    for dep in INCOMPATIBLE_DEPENDENCIES.iter().filter(|d| deps.contains(&d.name)) {
        out.push(Issue::new(
            ids::BUNDLE002,
            Severity::High,
            Detection::Static,
            format!(
                "Dependency '{}' is incompatible with the edge runtime ({})",
                dep.name, dep.reason
            ),
            format!("Replace with {}", dep.alternative),
        ));
    }

    for dep in HEAVY_DEPENDENCIES.iter().filter(|d| deps.contains(&d.name)) {
        out.push(Issue::new(
            ids::BUNDLE003,
            Severity::Medium,
            Detection::Static,
            format!("Heavy dependency '{}' adds about {}", dep.name, kib(dep.bytes)),
            format!("Consider {}", dep.alternative),
        ));
    }

    out
}

fn mib(bytes: u64) -> String {
    format!("{:.1} MiB", bytes as f64 / MIB as f64)
}

fn kib(bytes: u64) -> String {
    if bytes >= MIB {
        mib(bytes)
    } else {
        format!("{} KiB", bytes / KIB)
    }
}
