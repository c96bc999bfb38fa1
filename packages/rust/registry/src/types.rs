//! The project-type catalog: which slot categories count for each type.
//!
//! Every type owns a fixed subset of the five categories. Aliases resolve to
//! their owning canonical id. The table is immutable process-wide data; all
//! lookups are pure.

use crate::slots::Category::{self, Backend, Frontend, Human, Project, Universal};

/// Fallback type for unknown or undetectable projects.
pub const GENERIC_TYPE: &str = "generic";

/// Definition of one canonical project type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectTypeDef {
    /// Canonical identifier (kebab-case).
    pub id: &'static str,
    pub description: &'static str,
    /// Owned categories, in declaration order.
    pub categories: &'static [Category],
    pub aliases: &'static [&'static str],
}

const fn def(
    id: &'static str,
    description: &'static str,
    categories: &'static [Category],
    aliases: &'static [&'static str],
) -> ProjectTypeDef {
    ProjectTypeDef {
        id,
        description,
        categories,
        aliases,
    }
}

/// All canonical project types. `generic` is last and is the fallback.
pub static PROJECT_TYPES: &[ProjectTypeDef] = &[
    // CLI/Tool Types
    def("cli", "Command-line interface tool", &[Project, Human], &["cli-tool", "command-line"]),
    def("cli-tool", "Command-line interface tool", &[Project, Human], &[]),
    // Library/Package Types
    def("library", "Reusable code library/package", &[Project, Human], &["lib", "package"]),
    def("npm-package", "NPM package", &[Project, Human], &[]),
    def("pip-package", "Python pip package", &[Project, Human], &["pypi"]),
    def("crate", "Rust crate", &[Project, Human], &["rust-crate"]),
    def("gem", "Ruby gem", &[Project, Human], &["ruby-gem"]),
    // AI/ML Types
    def("mcp-server", "Model Context Protocol server", &[Project, Backend, Human], &[]),
    def("data-science", "Data science/analysis project", &[Project, Backend, Human], &["data-analysis", "analytics"]),
    def("ml-model", "Machine learning model", &[Project, Backend, Human], &["ai-model", "ml", "machine-learning"]),
    def("jupyter", "Jupyter notebook project", &[Project, Human], &["notebook", "ipynb"]),
    def("data-pipeline", "Data pipeline/ETL", &[Project, Backend, Human], &["etl", "pipeline"]),
    // API/Backend Types
    def("backend-api", "Backend API service", &[Project, Backend, Universal, Human], &["api", "backend", "rest-api"]),
    def("node-api", "Node.js API service", &[Project, Backend, Universal, Human], &["express", "fastify", "nest"]),
    def("python-api", "Python API service", &[Project, Backend, Universal, Human], &["flask", "fastapi", "django-api"]),
    def("python-app", "Python application", &[Project, Backend, Human], &[]),
    def("go-api", "Go API service", &[Project, Backend, Universal, Human], &["golang", "gin", "fiber"]),
    def("rust-api", "Rust API service", &[Project, Backend, Universal, Human], &["actix", "axum", "rocket"]),
    def("graphql", "GraphQL API service", &[Project, Backend, Universal, Human], &["graphql-api"]),
    def("microservice", "Microservice", &[Project, Backend, Universal, Human], &["service"]),
    // Frontend Types
    def("frontend", "Frontend-only web application", &[Project, Frontend, Universal, Human], &[]),
    def("svelte", "Svelte web application", &[Project, Frontend, Universal, Human], &["sveltekit"]),
    def("react", "React web application", &[Project, Frontend, Universal, Human], &["reactjs"]),
    def("vue", "Vue.js web application", &[Project, Frontend, Universal, Human], &["vuejs", "nuxt"]),
    def("angular", "Angular web application", &[Project, Frontend, Universal, Human], &[]),
    def("nextjs", "Next.js application", &[Project, Frontend, Backend, Universal, Human], &["next"]),
    def("remix", "Remix application", &[Project, Frontend, Backend, Universal, Human], &[]),
    def("astro", "Astro static site", &[Project, Frontend, Universal, Human], &[]),
    def("solid", "SolidJS application", &[Project, Frontend, Universal, Human], &["solidjs"]),
    def("qwik", "Qwik application", &[Project, Frontend, Universal, Human], &[]),
    // Fullstack Types
    def("fullstack", "Full-stack web application", &[Project, Frontend, Backend, Universal, Human], &[]),
    def("t3", "T3 Stack (Next.js + tRPC + Prisma)", &[Project, Frontend, Backend, Universal, Human], &["t3-stack", "create-t3-app"]),
    def("mern", "MERN Stack (MongoDB + Express + React + Node)", &[Project, Frontend, Backend, Universal, Human], &[]),
    def("mean", "MEAN Stack (MongoDB + Express + Angular + Node)", &[Project, Frontend, Backend, Universal, Human], &[]),
    def("lamp", "LAMP Stack (Linux + Apache + MySQL + PHP)", &[Project, Frontend, Backend, Universal, Human], &[]),
    def("django", "Django web application", &[Project, Frontend, Backend, Universal, Human], &[]),
    def("rails", "Ruby on Rails application", &[Project, Frontend, Backend, Universal, Human], &["ruby-on-rails", "ror"]),
    def("laravel", "Laravel PHP application", &[Project, Frontend, Backend, Universal, Human], &[]),
    // Mobile Types
    def("mobile", "Mobile application", &[Project, Frontend, Human], &["mobile-app"]),
    def("react-native", "React Native mobile app", &[Project, Frontend, Human], &["rn", "expo"]),
    def("flutter", "Flutter mobile app", &[Project, Frontend, Human], &["dart"]),
    def("ios", "iOS native app", &[Project, Frontend, Human], &["swift", "swiftui"]),
    def("android", "Android native app", &[Project, Frontend, Human], &["kotlin", "kotlin-android"]),
    def("ionic", "Ionic mobile app", &[Project, Frontend, Human], &["capacitor"]),
    // Desktop Types
    def("desktop", "Desktop application", &[Project, Frontend, Human], &["desktop-app"]),
    def("electron", "Electron desktop app", &[Project, Frontend, Human], &[]),
    def("tauri", "Tauri desktop app", &[Project, Frontend, Human], &[]),
    def("qt", "Qt desktop application", &[Project, Frontend, Human], &["pyqt", "pyside"]),
    def("gtk", "GTK desktop application", &[Project, Frontend, Human], &[]),
    // Browser Extensions
    def("chrome-extension", "Chrome browser extension", &[Project, Human], &["browser-extension", "extension"]),
    def("firefox-extension", "Firefox browser extension", &[Project, Human], &["firefox-addon"]),
    def("safari-extension", "Safari browser extension", &[Project, Human], &[]),
    // Automation/Workflow Types
    def("n8n-workflow", "n8n automation workflow", &[Project, Backend, Human], &["n8n"]),
    def("zapier", "Zapier integration", &[Project, Human], &[]),
    def("github-action", "GitHub Action", &[Project, Human], &["gha", "action"]),
    // DevOps/Infrastructure Types
    def("terraform", "Terraform infrastructure", &[Project, Human], &["tf", "iac"]),
    def("kubernetes", "Kubernetes configuration", &[Project, Human], &["k8s", "helm"]),
    def("docker", "Docker/container configuration", &[Project, Human], &["dockerfile", "container"]),
    def("ansible", "Ansible playbooks", &[Project, Human], &[]),
    def("pulumi", "Pulumi infrastructure", &[Project, Human], &[]),
    def("infrastructure", "Infrastructure as code", &[Project, Human], &["infra", "devops"]),
    // Static Sites / Documentation
    def("static-html", "Static HTML website", &[Project, Frontend, Human], &["static-site", "html"]),
    def("landing-page", "Landing page website", &[Project, Frontend, Human], &["landing"]),
    def("documentation", "Documentation site", &[Project, Frontend, Human], &["docs"]),
    def("docusaurus", "Docusaurus documentation site", &[Project, Frontend, Human], &[]),
    def("mkdocs", "MkDocs documentation site", &[Project, Human], &[]),
    def("vitepress", "VitePress documentation site", &[Project, Frontend, Human], &[]),
    def("storybook", "Storybook component library", &[Project, Frontend, Human], &[]),
    // CMS Types
    def("wordpress", "WordPress site/plugin/theme", &[Project, Frontend, Backend, Universal, Human], &["wp"]),
    def("cms", "Content management system", &[Project, Frontend, Backend, Human], &[]),
    def("strapi", "Strapi headless CMS", &[Project, Backend, Universal, Human], &[]),
    def("sanity", "Sanity.io CMS", &[Project, Backend, Human], &[]),
    def("contentful", "Contentful CMS integration", &[Project, Human], &[]),
    // Game Development Types
    def("game", "Game project", &[Project, Frontend, Human], &["gamedev"]),
    def("unity", "Unity game", &[Project, Frontend, Human], &["unity3d"]),
    def("godot", "Godot game", &[Project, Frontend, Human], &[]),
    def("unreal", "Unreal Engine game", &[Project, Frontend, Human], &["ue4", "ue5"]),
    def("phaser", "Phaser.js game", &[Project, Frontend, Human], &[]),
    def("threejs", "Three.js 3D project", &[Project, Frontend, Human], &["three", "3d", "webgl"]),
    // Blockchain/Web3 Types
    def("smart-contract", "Smart contract", &[Project, Human], &["solidity", "contract"]),
    def("dapp", "Decentralized application", &[Project, Frontend, Human], &["web3", "blockchain"]),
    def("hardhat", "Hardhat Ethereum project", &[Project, Human], &[]),
    def("foundry", "Foundry Ethereum project", &[Project, Human], &["forge"]),
    // Monorepo Types
    def("monorepo", "Monorepo - multi-package repository", &[Project, Frontend, Backend, Universal, Human], &["mono", "workspace"]),
    def("turborepo", "Turborepo monorepo", &[Project, Frontend, Backend, Universal, Human], &["turbo"]),
    def("nx", "Nx monorepo", &[Project, Frontend, Backend, Universal, Human], &[]),
    def("lerna", "Lerna monorepo", &[Project, Frontend, Backend, Universal, Human], &[]),
    def("pnpm-workspace", "pnpm workspace monorepo", &[Project, Frontend, Backend, Universal, Human], &["pnpm-mono"]),
    def("yarn-workspace", "Yarn workspace monorepo", &[Project, Frontend, Backend, Universal, Human], &["yarn-mono"]),
    // Embedded/Systems Types
    def("embedded", "Embedded systems", &[Project, Human], &["firmware", "iot"]),
    def("arduino", "Arduino project", &[Project, Human], &[]),
    def("raspberry-pi", "Raspberry Pi project", &[Project, Human], &["rpi"]),
    def("wasm", "WebAssembly module", &[Project, Human], &["webassembly"]),
    // Testing Types
    def("test-suite", "Test suite/framework", &[Project, Human], &["testing", "tests"]),
    def("e2e-tests", "End-to-end test suite", &[Project, Human], &["e2e", "playwright", "cypress"]),
    // Default
    def("generic", "Generic project (fallback)", &[Project, Universal, Human], &[]),
];

/// Look up a canonical type definition by id (no alias resolution).
pub fn lookup(id: &str) -> Option<&'static ProjectTypeDef> {
    PROJECT_TYPES.iter().find(|t| t.id == id)
}

/// The `generic` definition.
pub fn generic() -> &'static ProjectTypeDef {
    lookup(GENERIC_TYPE).unwrap_or(&GENERIC_DEF)
}

// Kept identical to the `generic` table row; only reached if that row is removed.
static GENERIC_DEF: ProjectTypeDef = def(
    "generic",
    "Generic project (fallback)",
    &[Project, Universal, Human],
    &[],
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_unique_ids() {
        let mut ids = HashSet::new();
        for t in PROJECT_TYPES {
            assert!(ids.insert(t.id), "duplicate type id {}", t.id);
        }
        assert_eq!(PROJECT_TYPES.len(), 96);
    }

    #[test]
    fn categories_keep_declaration_order() {
        for t in PROJECT_TYPES {
            assert!(!t.categories.is_empty(), "{} has no categories", t.id);
            assert!(
                t.categories.windows(2).all(|w| w[0] < w[1]),
                "{} categories out of order",
                t.id
            );
        }
    }

    #[test]
    fn every_type_counts_project_and_human() {
        for t in PROJECT_TYPES {
            assert!(t.categories.contains(&Project), "{}", t.id);
            assert!(t.categories.contains(&Human), "{}", t.id);
        }
    }

    #[test]
    fn generic_row_matches_fallback() {
        assert_eq!(generic(), &GENERIC_DEF);
    }
}
