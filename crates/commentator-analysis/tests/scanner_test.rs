//! Structural scanner over realistic C++ sources.

use commentator_analysis::structure::{scan_source, ConstructKind, NamingBucket, ScopeKind};

const GAME_LOOP: &str = r#"
#include <vector>
#define MAX_UNITS 64

namespace sim {

constexpr int kTickRate = 60;

/// Advances every unit.
class World {
public:
    void step(float dt);

private:
    std::vector<int> m_units;
    unsigned char m_grid[MAX_UNITS];
};

void World::step(float dt) {
    for (auto& unit : m_units) {
        if (unit & 0x1) {
            unit >>= 1;
        }
    }
    int remaining = static_cast<int>(m_units.size());
    while (remaining > 0) {
        --remaining;
    }
    switch (m_units.size() % 4) {
    case 0: break;
    default: break;
    }
}

} // namespace sim
"#;

#[test]
fn detects_every_kind_in_order() {
    let scan = scan_source("sim/world.cpp", GAME_LOOP);
    let found: Vec<_> = scan
        .constructs
        .iter()
        .map(|c| (c.kind, c.identifier().unwrap_or("")))
        .collect();
    assert_eq!(
        found,
        vec![
            (ConstructKind::VariableDeclaration, "kTickRate"),
            (ConstructKind::VariableDeclaration, "m_units"),
            (ConstructKind::VariableDeclaration, "m_grid"),
            (ConstructKind::FunctionDefinition, "step"),
            (ConstructKind::Loop, "unit"),
            (ConstructKind::Conditional, "unit"),
            (ConstructKind::VariableDeclaration, "remaining"),
            (ConstructKind::Loop, "remaining"),
            (ConstructKind::Conditional, "m_units"),
        ]
    );
    assert!(scan.stats.flat_from_line.is_none());
    assert_eq!(scan.stats.unclosed_scopes, 0);
}

#[test]
fn facts_and_buckets() {
    let scan = scan_source("sim/world.cpp", GAME_LOOP);
    let tick = &scan.constructs[0];
    assert_eq!(tick.bucket, NamingBucket::Prefixed);
    assert!(tick.facts.is_const);
    assert_eq!(tick.literals[0].key, "60");
    assert_eq!(scan.scopes.path(tick.scope), "sim");

    let grid = &scan.constructs[2];
    assert!(grid.facts.is_array);
    assert!(grid.facts.is_unsigned_type());
    assert_eq!(scan.scopes.get(grid.scope).kind, ScopeKind::Class);

    let step = &scan.constructs[3];
    assert_eq!(step.qualified_name.as_deref(), Some("World::step"));
    assert_eq!(step.location.file, "sim/world.cpp");
    assert_eq!(step.location.line_start, 19);
    assert_eq!(step.facts.type_text.as_deref(), Some("void"));
}

#[test]
fn doc_comment_is_not_attached_to_a_class() {
    // Classes are not constructs; the comment stays unattached.
    let scan = scan_source("sim/world.cpp", GAME_LOOP);
    assert!(scan.constructs.iter().all(|c| c.existing_comment.is_none()));
    assert!(scan.comments >= 2);
}

#[test]
fn block_comments_attach_to_the_following_construct() {
    let src = "/*\n * Frames between saves.\n */\nint autosave_interval = 300;\n";
    let scan = scan_source("save.cpp", src);
    assert_eq!(scan.constructs[0].existing_comment.as_deref(), Some("Frames between saves."));
    assert_eq!(scan.constructs[0].bucket, NamingBucket::LongDescriptive);
}

#[test]
fn empty_and_comment_only_sources() {
    assert!(scan_source("empty.cpp", "").constructs.is_empty());
    let scan = scan_source("notes.h", "// nothing here\n/* at all */\n");
    assert!(scan.constructs.is_empty());
    assert_eq!(scan.scopes.len(), 1);
}
