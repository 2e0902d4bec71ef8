use deptree_core::db::{open_db, open_db_in_memory};
use deptree_core::{
    children_of, max_depth, roots_of, Department, DepartmentForm, DepartmentId, DepartmentPatch,
    DepartmentRepository, DepartmentValidationError, FormSubmission, LocalDepartmentStore,
    LocalStoreError, NewDepartment, SqliteDepartmentRepository, SubDepartment,
};
use rusqlite::Connection;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn open_store(conn: &Connection) -> LocalDepartmentStore<SqliteDepartmentRepository<'_>> {
    let repo = SqliteDepartmentRepository::try_new(conn).unwrap();
    LocalDepartmentStore::open(repo).unwrap()
}

fn ids(items: &[&Department]) -> Vec<DepartmentId> {
    items.iter().map(|dept| dept.id.clone()).collect()
}

#[test]
fn engineering_tree_roots_children_and_depth() {
    let conn = setup();
    let mut store = open_store(&conn);

    let eng = store.create(NewDepartment::new("Eng")).unwrap();
    let backend = store
        .create(NewDepartment::new("Backend").with_parent(eng.id.clone()))
        .unwrap();
    let frontend = store
        .create(NewDepartment::new("Frontend").with_parent(eng.id.clone()))
        .unwrap();

    let list = store.departments();
    assert_eq!(max_depth(list), 2);
    assert_eq!(ids(&roots_of(list)), vec![eng.id.clone()]);
    assert_eq!(
        ids(&children_of(list, &eng.id)),
        vec![backend.id.clone(), frontend.id.clone()]
    );
}

#[test]
fn delete_promotes_exactly_the_direct_children() {
    let conn = setup();
    let mut store = open_store(&conn);

    let eng = store.create(NewDepartment::new("Eng")).unwrap();
    let backend = store
        .create(NewDepartment::new("Backend").with_parent(eng.id.clone()))
        .unwrap();
    let frontend = store
        .create(NewDepartment::new("Frontend").with_parent(eng.id.clone()))
        .unwrap();
    let api = store
        .create(NewDepartment::new("Api").with_parent(backend.id.clone()))
        .unwrap();
    let sales = store.create(NewDepartment::new("Sales")).unwrap();
    let before: Vec<Department> = store.departments().to_vec();

    let promoted = store.delete(&eng.id).unwrap();
    assert_eq!(promoted, vec![backend.id.clone(), frontend.id.clone()]);

    let after = store.departments();
    assert!(after.iter().all(|dept| dept.id != eng.id));
    assert_eq!(after.len(), before.len() - 1);
    for dept in after {
        let original = before.iter().find(|item| item.id == dept.id).unwrap();
        if promoted.contains(&dept.id) {
            assert_eq!(dept.parent_id, None);
            assert_eq!(dept.name, original.name);
        } else {
            assert_eq!(dept, original);
        }
    }
    let api_after = store.get(&api.id).unwrap();
    assert_eq!(api_after.parent_id, Some(backend.id.clone()));
    assert!(store.get(&sales.id).unwrap().is_root());

    // Persisted state matches what the store shows.
    let reopened = open_store(&conn);
    assert_eq!(reopened.departments(), store.departments());
}

#[test]
fn update_after_create_keeps_id() {
    let conn = setup();
    let mut store = open_store(&conn);

    let created = store.create(NewDepartment::new("A")).unwrap();
    let updated = store
        .update(&created.id, &DepartmentPatch::name("B"))
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "B");
    assert_eq!(store.get(&created.id).unwrap().name, "B");
}

#[test]
fn update_merges_shallowly_and_replaces_sub_departments() {
    let conn = setup();
    let mut store = open_store(&conn);

    let parent = store.create(NewDepartment::new("Parent")).unwrap();
    let created = store
        .create(
            NewDepartment::new("Eng")
                .with_parent(parent.id.clone())
                .with_sub_departments(["Core", "Infra"]),
        )
        .unwrap();

    let patch = DepartmentPatch::default()
        .with_sub_departments(vec![SubDepartment::new(""), SubDepartment::new("Platform")]);
    let updated = store.update(&created.id, &patch).unwrap();

    assert_eq!(updated.name, "Eng");
    assert_eq!(updated.parent_id, Some(parent.id.clone()));
    assert_eq!(updated.sub_departments, vec![SubDepartment::new("Platform")]);

    let repo = SqliteDepartmentRepository::try_new(&conn).unwrap();
    assert_eq!(repo.get(&created.id).unwrap().unwrap(), updated);
}

#[test]
fn update_can_move_to_root() {
    let conn = setup();
    let mut store = open_store(&conn);

    let parent = store.create(NewDepartment::new("Parent")).unwrap();
    let child = store
        .create(NewDepartment::new("Child").with_parent(parent.id.clone()))
        .unwrap();

    let moved = store
        .update(&child.id, &DepartmentPatch::default().with_parent(None))
        .unwrap();
    assert!(moved.is_root());
}

#[test]
fn missing_targets_are_not_found() {
    let conn = setup();
    let mut store = open_store(&conn);
    let ghost = DepartmentId::from("ghost");

    let err = store
        .update(&ghost, &DepartmentPatch::name("B"))
        .unwrap_err();
    assert!(matches!(err, LocalStoreError::NotFound(id) if id == ghost));

    let err = store.delete(&ghost).unwrap_err();
    assert!(matches!(err, LocalStoreError::NotFound(id) if id == ghost));
}

#[test]
fn blank_names_are_rejected_without_writing() {
    let conn = setup();
    let mut store = open_store(&conn);

    let err = store.create(NewDepartment::new("   ")).unwrap_err();
    assert!(matches!(
        err,
        LocalStoreError::Validation(DepartmentValidationError::BlankName)
    ));
    assert!(store.departments().is_empty());

    let created = store.create(NewDepartment::new("Eng")).unwrap();
    let err = store
        .update(&created.id, &DepartmentPatch::name(""))
        .unwrap_err();
    assert!(matches!(err, LocalStoreError::Validation(_)));
    assert_eq!(store.get(&created.id).unwrap().name, "Eng");
}

#[test]
fn create_trims_name_and_filters_sub_departments() {
    let conn = setup();
    let mut store = open_store(&conn);

    let created = store
        .create(NewDepartment::new("  Eng  ").with_sub_departments(["Core", "  ", "Infra"]))
        .unwrap();
    assert_eq!(created.name, "Eng");
    assert_eq!(
        created.sub_departments,
        vec![SubDepartment::new("Core"), SubDepartment::new("Infra")]
    );
    assert!(matches!(created.id, DepartmentId::Opaque(_)));
}

#[test]
fn editing_target_is_transient_and_cleared_by_update() {
    let conn = setup();
    let mut store = open_store(&conn);

    let created = store.create(NewDepartment::new("Eng")).unwrap();
    store.set_editing(Some(created.clone()));

    let form = DepartmentForm::from_editing(store.editing());
    assert!(form.is_edit());
    let FormSubmission::Update { id, patch } = form.submission() else {
        panic!("editing form must submit an update");
    };
    store.update(&id, &patch).unwrap();

    assert_eq!(store.editing(), None);
    assert!(!DepartmentForm::from_editing(store.editing()).is_edit());
}

#[test]
fn mirror_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mirror.db");

    let created = {
        let conn = open_db(&path).unwrap();
        let mut store = open_store(&conn);
        store
            .create(NewDepartment::new("Eng").with_sub_departments(["Core"]))
            .unwrap()
    };

    let conn = open_db(&path).unwrap();
    let store = open_store(&conn);
    assert_eq!(store.departments(), &[created]);
}

#[test]
fn dangling_parent_is_stored_and_tolerated() {
    let conn = setup();
    let mut store = open_store(&conn);

    store.create(NewDepartment::new("Root")).unwrap();
    store
        .create(NewDepartment::new("Orphan").with_parent(DepartmentId::from("missing")))
        .unwrap();

    assert_eq!(store.departments().len(), 2);
    assert_eq!(roots_of(store.departments()).len(), 1);
    assert_eq!(max_depth(store.departments()), 1);
}

#[test]
fn parent_id_variant_survives_reload_and_reopen() {
    let conn = setup();
    let mut store = open_store(&conn);

    let opaque_child = store
        .create(NewDepartment::new("Child").with_parent(DepartmentId::from("42")))
        .unwrap();
    let numeric_child = store
        .create(NewDepartment::new("Remote child").with_parent(DepartmentId::Numeric(42)))
        .unwrap();

    store.reload().unwrap();
    assert_eq!(
        store.get(&opaque_child.id).unwrap().parent_id,
        Some(DepartmentId::Opaque("42".to_string()))
    );
    assert_eq!(
        store.get(&numeric_child.id).unwrap().parent_id,
        Some(DepartmentId::Numeric(42))
    );
    assert_eq!(
        ids(&children_of(store.departments(), &DepartmentId::from("42"))),
        vec![opaque_child.id.clone()]
    );

    let reopened = open_store(&conn);
    assert_eq!(reopened.departments(), store.departments());
}
