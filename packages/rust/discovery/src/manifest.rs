//! Manifest and marker-file inspection.
//!
//! Each manifest contributes whatever it can; the first signal for a field
//! wins. Unreadable or malformed manifests are skipped, not reported.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::{PartialContext, fill, locate::exists};

/// `(dependency name, display name)` tables, checked in order.
type DepTable = &'static [(&'static str, &'static str)];

const NODE_FRONTEND: DepTable = &[
    ("next", "Next.js"),
    ("nuxt", "Nuxt"),
    ("@sveltejs/kit", "SvelteKit"),
    ("svelte", "Svelte"),
    ("@angular/core", "Angular"),
    ("vue", "Vue"),
    ("solid-js", "SolidJS"),
    ("astro", "Astro"),
    ("@builder.io/qwik", "Qwik"),
    ("preact", "Preact"),
    ("react", "React"),
];

const NODE_BACKEND: DepTable = &[
    ("@nestjs/core", "NestJS"),
    ("express", "Express"),
    ("fastify", "Fastify"),
    ("koa", "Koa"),
    ("hono", "Hono"),
    ("@hapi/hapi", "hapi"),
];

const NODE_DATABASE: DepTable = &[
    ("@prisma/client", "Prisma"),
    ("prisma", "Prisma"),
    ("drizzle-orm", "Drizzle"),
    ("pg", "PostgreSQL"),
    ("mysql2", "MySQL"),
    ("mongoose", "MongoDB"),
    ("mongodb", "MongoDB"),
    ("better-sqlite3", "SQLite"),
    ("sqlite3", "SQLite"),
    ("@supabase/supabase-js", "Supabase"),
    ("firebase", "Firebase"),
    ("ioredis", "Redis"),
    ("redis", "Redis"),
];

const NODE_BUILD: DepTable = &[
    ("vite", "Vite"),
    ("webpack", "Webpack"),
    ("esbuild", "esbuild"),
    ("rollup", "Rollup"),
    ("parcel", "Parcel"),
    ("tsup", "tsup"),
    ("turbo", "Turborepo"),
];

const RUST_FRONTEND: DepTable = &[("leptos", "Leptos"), ("yew", "Yew"), ("dioxus", "Dioxus")];

const RUST_BACKEND: DepTable = &[
    ("axum", "Axum"),
    ("actix-web", "Actix Web"),
    ("rocket", "Rocket"),
    ("warp", "Warp"),
    ("poem", "Poem"),
];

const RUST_DATABASE: DepTable = &[
    ("sqlx", "SQLx"),
    ("diesel", "Diesel"),
    ("sea-orm", "SeaORM"),
    ("rusqlite", "SQLite"),
    ("libsql", "libSQL"),
    ("mongodb", "MongoDB"),
    ("redis", "Redis"),
];

const PYTHON_BACKEND: DepTable = &[
    ("django", "Django"),
    ("fastapi", "FastAPI"),
    ("flask", "Flask"),
    ("starlette", "Starlette"),
    ("tornado", "Tornado"),
];

const PYTHON_DATABASE: DepTable = &[
    ("psycopg2", "PostgreSQL"),
    ("psycopg2-binary", "PostgreSQL"),
    ("psycopg", "PostgreSQL"),
    ("asyncpg", "PostgreSQL"),
    ("pymysql", "MySQL"),
    ("pymongo", "MongoDB"),
    ("sqlalchemy", "SQLAlchemy"),
    ("redis", "Redis"),
];

const GO_BACKEND: DepTable = &[
    ("github.com/gin-gonic/gin", "Gin"),
    ("github.com/gofiber/fiber", "Fiber"),
    ("github.com/labstack/echo", "Echo"),
    ("github.com/go-chi/chi", "chi"),
];

/// Hosting marker files, highest priority first.
const HOSTING_MARKERS: DepTable = &[
    ("vercel.json", "Vercel"),
    ("netlify.toml", "Netlify"),
    ("fly.toml", "Fly.io"),
    ("wrangler.toml", "Cloudflare Workers"),
    ("render.yaml", "Render"),
    ("firebase.json", "Firebase Hosting"),
    ("app.yaml", "Google App Engine"),
    ("Procfile", "Heroku"),
    ("Dockerfile", "Docker"),
];

/// Build marker files, used when no manifest named a build tool.
const BUILD_MARKERS: DepTable = &[
    ("Makefile", "Make"),
    ("CMakeLists.txt", "CMake"),
    ("build.gradle", "Gradle"),
    ("build.gradle.kts", "Gradle"),
    ("pom.xml", "Maven"),
];

/// Leading package name of a requirement specifier (`Django>=4.2` → `django`).
static REQUIREMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._\-]*)").expect("requirement regex"));

fn first_match(deps: &[String], table: DepTable) -> Option<&'static str> {
    table
        .iter()
        .find(|(name, _)| deps.iter().any(|d| d == name))
        .map(|(_, display)| *display)
}

fn read(dir: &Path, name: &str) -> Option<String> {
    std::fs::read_to_string(dir.join(name)).ok()
}

/// Inspect every known manifest in `dir`.
pub(crate) fn inspect_manifests(dir: &Path, ctx: &mut PartialContext) {
    inspect_package_json(dir, ctx);
    inspect_cargo_toml(dir, ctx);
    inspect_pyproject(dir, ctx);
    inspect_requirements(dir, ctx);
    inspect_go_mod(dir, ctx);
    inspect_gemfile(dir, ctx);
    inspect_composer(dir, ctx);
}

/// Hosting and build marker files.
pub(crate) fn inspect_markers(dir: &Path, ctx: &mut PartialContext) {
    if let Some((_, hosting)) = HOSTING_MARKERS.iter().find(|(f, _)| exists(&dir.join(f))) {
        fill(&mut ctx.hosting, *hosting);
    }
    if let Some((_, build)) = BUILD_MARKERS.iter().find(|(f, _)| exists(&dir.join(f))) {
        fill(&mut ctx.build_tool, *build);
    }
}

fn inspect_package_json(dir: &Path, ctx: &mut PartialContext) {
    let Some(content) = read(dir, "package.json") else {
        return;
    };
    let json: Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "package.json is malformed, skipping");
            return;
        }
    };

    let deps: Vec<String> = ["dependencies", "devDependencies", "peerDependencies"]
        .iter()
        .filter_map(|key| json.get(key).and_then(Value::as_object))
        .flat_map(|map| map.keys().cloned())
        .collect();

    if let Some(name) = json.get("name").and_then(Value::as_str) {
        fill(&mut ctx.project_name, name);
    }
    let typescript = deps.iter().any(|d| d == "typescript") || exists(&dir.join("tsconfig.json"));
    fill(
        &mut ctx.main_language,
        if typescript { "TypeScript" } else { "JavaScript" },
    );
    if let Some(fw) = first_match(&deps, NODE_FRONTEND) {
        fill(&mut ctx.framework, fw);
    }
    if let Some(be) = first_match(&deps, NODE_BACKEND) {
        fill(&mut ctx.backend, be);
    }
    if let Some(db) = first_match(&deps, NODE_DATABASE) {
        fill(&mut ctx.database, db);
    }
    if let Some(build) = first_match(&deps, NODE_BUILD) {
        fill(&mut ctx.build_tool, build);
    }
}

fn inspect_cargo_toml(dir: &Path, ctx: &mut PartialContext) {
    let Some(content) = read(dir, "Cargo.toml") else {
        return;
    };
    let manifest: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(e) => {
            debug!(error = %e, "Cargo.toml is malformed, skipping");
            return;
        }
    };

    let deps: Vec<String> = ["dependencies", "dev-dependencies"]
        .iter()
        .filter_map(|key| manifest.get(*key).and_then(toml::Value::as_table))
        .chain(
            manifest
                .get("workspace")
                .and_then(|w| w.get("dependencies"))
                .and_then(toml::Value::as_table),
        )
        .flat_map(|t| t.keys().cloned())
        .collect();

    if let Some(name) = manifest
        .get("package")
        .and_then(|p| p.get("name"))
        .and_then(toml::Value::as_str)
    {
        fill(&mut ctx.project_name, name);
    }
    fill(&mut ctx.main_language, "Rust");
    if let Some(fw) = first_match(&deps, RUST_FRONTEND) {
        fill(&mut ctx.framework, fw);
    }
    if let Some(be) = first_match(&deps, RUST_BACKEND) {
        fill(&mut ctx.backend, be);
    }
    if let Some(db) = first_match(&deps, RUST_DATABASE) {
        fill(&mut ctx.database, db);
    }
    fill(&mut ctx.build_tool, "Cargo");
}

fn inspect_pyproject(dir: &Path, ctx: &mut PartialContext) {
    let Some(content) = read(dir, "pyproject.toml") else {
        return;
    };
    let manifest: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(e) => {
            debug!(error = %e, "pyproject.toml is malformed, skipping");
            return;
        }
    };

    let poetry = manifest.get("tool").and_then(|t| t.get("poetry"));
    let name = manifest
        .get("project")
        .and_then(|p| p.get("name"))
        .or_else(|| poetry.and_then(|p| p.get("name")))
        .and_then(toml::Value::as_str);
    if let Some(name) = name {
        fill(&mut ctx.project_name, name);
    }

    let mut deps: Vec<String> = manifest
        .get("project")
        .and_then(|p| p.get("dependencies"))
        .and_then(toml::Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(toml::Value::as_str)
                .filter_map(requirement_name)
                .collect()
        })
        .unwrap_or_default();
    if let Some(table) = poetry
        .and_then(|p| p.get("dependencies"))
        .and_then(toml::Value::as_table)
    {
        deps.extend(table.keys().map(|k| k.to_ascii_lowercase()));
    }

    fill(&mut ctx.main_language, "Python");
    apply_python_deps(&deps, ctx);
    if poetry.is_some() {
        fill(&mut ctx.build_tool, "Poetry");
    } else if content.contains("hatchling") {
        fill(&mut ctx.build_tool, "Hatch");
    } else if content.contains("setuptools") {
        fill(&mut ctx.build_tool, "setuptools");
    }
}

fn inspect_requirements(dir: &Path, ctx: &mut PartialContext) {
    let Some(content) = read(dir, "requirements.txt") else {
        return;
    };
    let deps: Vec<String> = content
        .lines()
        .filter(|l| !l.trim_start().starts_with('#'))
        .filter_map(requirement_name)
        .collect();

    fill(&mut ctx.main_language, "Python");
    apply_python_deps(&deps, ctx);
    fill(&mut ctx.build_tool, "pip");
}

fn requirement_name(spec: &str) -> Option<String> {
    REQUIREMENT_RE
        .captures(spec)
        .map(|caps| caps[1].to_ascii_lowercase())
}

fn apply_python_deps(deps: &[String], ctx: &mut PartialContext) {
    if let Some(be) = first_match(deps, PYTHON_BACKEND) {
        fill(&mut ctx.backend, be);
    }
    if let Some(db) = first_match(deps, PYTHON_DATABASE) {
        fill(&mut ctx.database, db);
    }
}

fn inspect_go_mod(dir: &Path, ctx: &mut PartialContext) {
    let Some(content) = read(dir, "go.mod") else {
        return;
    };

    let mut deps = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if let Some(module) = line.strip_prefix("module ") {
            let module = module.trim();
            let short = module.rsplit('/').next().unwrap_or(module);
            fill(&mut ctx.project_name, short);
        } else if let Some(dep) = line
            .trim_start_matches("require ")
            .split_whitespace()
            .next()
            .filter(|d| d.contains('/'))
        {
            // Strip major-version suffixes (`.../fiber/v2`).
            let dep = dep.trim_end_matches(|c: char| c.is_ascii_digit());
            deps.push(dep.trim_end_matches("/v").to_string());
        }
    }

    fill(&mut ctx.main_language, "Go");
    if let Some(be) = first_match(&deps, GO_BACKEND) {
        fill(&mut ctx.backend, be);
    }
    fill(&mut ctx.build_tool, "Go modules");
}

fn inspect_gemfile(dir: &Path, ctx: &mut PartialContext) {
    let Some(content) = read(dir, "Gemfile") else {
        return;
    };
    fill(&mut ctx.main_language, "Ruby");
    if content.contains("gem \"rails\"") || content.contains("gem 'rails'") {
        fill(&mut ctx.backend, "Rails");
    }
    if content.contains("gem \"pg\"") || content.contains("gem 'pg'") {
        fill(&mut ctx.database, "PostgreSQL");
    }
    fill(&mut ctx.build_tool, "Bundler");
}

fn inspect_composer(dir: &Path, ctx: &mut PartialContext) {
    let Some(content) = read(dir, "composer.json") else {
        return;
    };
    let Ok(json) = serde_json::from_str::<Value>(&content) else {
        debug!("composer.json is malformed, skipping");
        return;
    };

    if let Some(name) = json.get("name").and_then(Value::as_str) {
        let short = name.rsplit('/').next().unwrap_or(name);
        fill(&mut ctx.project_name, short);
    }
    fill(&mut ctx.main_language, "PHP");
    let requires = json.get("require").and_then(Value::as_object);
    if requires.is_some_and(|r| r.contains_key("laravel/framework")) {
        fill(&mut ctx.backend, "Laravel");
    } else if requires.is_some_and(|r| r.keys().any(|k| k.starts_with("symfony/"))) {
        fill(&mut ctx.backend, "Symfony");
    }
    fill(&mut ctx.build_tool, "Composer");
}
