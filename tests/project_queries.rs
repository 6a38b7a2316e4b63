//! End-to-end queries against the checked-in fixture projects

use std::path::{Path, PathBuf};

use lscode::LscodeResult;
use lscode::error::LscodeError;
use lscode::infra::source_cache::SourceCache;
use lscode::models::symbol::{CandidateSymbol, Location};
use lscode::services::analysis::program::LoadOptions;
use lscode::services::{ConfigResolver, Navigator, SymbolLocator, SyntaxEngine, select};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

struct Session {
    engine: SyntaxEngine,
    file: PathBuf,
    config: Option<PathBuf>,
}

impl Session {
    fn open(project: &str, file: &str, tsconfig: Option<&str>) -> LscodeResult<Self> {
        let root = fixture(project);
        let file = root.join(file);
        let settings = ConfigResolver::new(&root).settings(&file, tsconfig.map(Path::new))?;
        let options = LoadOptions {
            max_file_size_bytes: u64::MAX,
            follow_imports: true,
        };
        let engine = SyntaxEngine::load(&settings, &mut SourceCache::new(), options)?;
        Ok(Self {
            engine,
            file,
            config: settings.config_path,
        })
    }

    fn candidates(&self, name: &str) -> Vec<CandidateSymbol> {
        SymbolLocator::new(&self.engine).locate(&self.file, name).unwrap()
    }

    fn references(&self, name: &str, n: i64) -> Vec<Location> {
        let candidates = self.candidates(name);
        let selected = select(&candidates, n, name, &self.file).unwrap();
        Navigator::new(&self.engine).references(selected)
    }
}

fn in_file(locations: &[Location], name: &str) -> usize {
    locations.iter().filter(|l| l.file.ends_with(name)).count()
}

#[test]
fn test_add_has_two_declarations_in_file_order() {
    let session = Session::open("basic", "math.ts", None).unwrap();
    let candidates = session.candidates("add");

    assert_eq!(candidates.len(), 2);
    assert_eq!((candidates[0].location.line, candidates[0].location.character), (0, 13));
    assert_eq!((candidates[1].location.line, candidates[1].location.character), (11, 8));
    assert_eq!(
        candidates[1].source_line,
        "  const add = (x: number, y: number) => x - y;"
    );
    assert_ne!(candidates[0].id, candidates[1].id);
}

#[test]
fn test_add_references_across_files() {
    let session = Session::open("basic", "math.ts", None).unwrap();
    let refs = session.references("add", 0);

    assert_eq!(refs.len(), 5);
    assert_eq!(in_file(&refs, "main.ts"), 4);
    // the declaration itself comes first
    assert!(refs[0].file.ends_with("math.ts"));
    assert_eq!((refs[0].line, refs[0].character), (0, 13));

    let main_positions: Vec<(u32, u32)> = refs[1..].iter().map(|l| (l.line, l.character)).collect();
    assert_eq!(main_positions, vec![(0, 9), (2, 16), (3, 16), (12, 14)]);
}

#[test]
fn test_nested_add_references_stay_in_scope() {
    let session = Session::open("basic", "math.ts", None).unwrap();
    let refs = session.references("add", 1);

    assert_eq!(refs.len(), 2);
    assert_eq!(in_file(&refs, "math.ts"), 2);
    assert_eq!(refs.iter().map(|l| l.line).collect::<Vec<_>>(), vec![11, 12]);
}

#[test]
fn test_pi_and_multiply_references() {
    let session = Session::open("basic", "math.ts", None).unwrap();

    assert_eq!(session.candidates("PI").len(), 1);
    let pi = session.references("PI", 0);
    assert_eq!(pi.len(), 4);
    assert_eq!(in_file(&pi, "main.ts"), 3);

    let multiply = session.references("multiply", 0);
    assert_eq!(multiply.len(), 4);
    assert_eq!(in_file(&multiply, "main.ts"), 3);
}

#[test]
fn test_references_are_stable() {
    let first = Session::open("basic", "math.ts", None).unwrap().references("add", 0);
    let second = Session::open("basic", "math.ts", None).unwrap().references("add", 0);
    assert_eq!(first, second);
}

#[test]
fn test_definition_through_import() {
    let session = Session::open("basic", "main.ts", None).unwrap();
    let candidates = session.candidates("add");
    assert_eq!(candidates.len(), 1);

    let definitions = Navigator::new(&session.engine).definitions(&candidates[0]);
    assert_eq!(definitions.len(), 1);
    assert!(definitions[0].location.file.ends_with("math.ts"));
    assert_eq!(definitions[0].location.line, 0);
    assert_eq!(
        definitions[0].code,
        "export const add = (a: number, b: number): number => {\n  return a + b;\n};"
    );
}

#[test]
fn test_definition_of_local_function() {
    let session = Session::open("basic", "main.ts", None).unwrap();
    let candidates = session.candidates("calculate");
    let definitions = Navigator::new(&session.engine).definitions(&candidates[0]);

    assert_eq!(definitions.len(), 1);
    assert!(definitions[0].code.starts_with("function calculate() {"));
    assert!(definitions[0].code.ends_with('}'));
}

#[test]
fn test_usage_only_name_is_not_found() {
    let session = Session::open("basic", "main.ts", None).unwrap();
    // only used in main.ts, declared elsewhere
    let candidates = session.candidates("log");
    let err = select(&candidates, 0, "log", &session.file).unwrap_err();
    assert_eq!(err.code(), "SYMBOL_NOT_FOUND");
}

#[test]
fn test_index_out_of_range() {
    let session = Session::open("basic", "math.ts", None).unwrap();
    let candidates = session.candidates("add");
    let err = select(&candidates, 10, "add", &session.file).unwrap_err();

    assert_eq!(err.code(), "SYMBOL_INDEX_OUT_OF_RANGE");
    let message = err.to_string();
    assert!(message.contains("10"));
    assert!(message.contains("Found 2"));
}

#[test]
fn test_excluded_file_is_not_in_project() {
    let err = Session::open("basic", "excluded.ts", None).err().unwrap();
    assert_eq!(err.code(), Some("FILE_NOT_IN_PROJECT"));
    assert!(err.to_string().contains("--tsconfig"));
}

#[test]
fn test_missing_explicit_tsconfig() {
    let err = Session::open("basic", "math.ts", Some("nonexistent.json")).err().unwrap();
    assert_eq!(err.code(), Some("TSCONFIG_NOT_FOUND"));
    assert!(err.to_string().contains("nonexistent.json"));
}

#[test]
fn test_standalone_file_without_tsconfig() {
    let session = Session::open("standalone", "lonely.ts", None).unwrap();
    assert!(session.config.is_none());

    let refs = session.references("greet", 0);
    assert_eq!(refs.len(), 4);
    assert!(refs[0].file.ends_with("helper.ts"));
    assert_eq!(in_file(&refs, "lonely.ts"), 3);
}

#[test]
fn test_workspace_reference_resolves_owning_project() {
    let session = Session::open("workspace", "packages/app/src/app.ts", None).unwrap();
    assert_eq!(
        session.config,
        Some(fixture("workspace").join("packages/app/tsconfig.json"))
    );

    let shape = session.references("Shape", 0);
    assert_eq!(shape.len(), 5);
    assert_eq!(in_file(&shape, "shapes.ts"), 2);

    let circle = session.references("Circle", 0);
    assert_eq!(circle.len(), 3);
}

#[test]
fn test_workspace_cycle_falls_back_to_root() {
    let err = Session::open("workspace", "loose/orphan.ts", None).err().unwrap();
    assert!(matches!(err, LscodeError::Tsconfig(_)));
    assert_eq!(err.code(), Some("FILE_NOT_IN_PROJECT"));
    assert!(err.to_string().contains("workspace/tsconfig.json"));
}

#[test]
fn test_explicit_tsconfig_governs() {
    let session = Session::open(
        "workspace",
        "packages/core/src/shapes.ts",
        Some("packages/core/tsconfig.json"),
    )
    .unwrap();
    // app.ts is outside the core project, so only core usages are found
    let refs = session.references("Shape", 0);
    assert_eq!(refs.len(), 2);
}
