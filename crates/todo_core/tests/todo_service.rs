use todo_core::db::open_db_in_memory;
use todo_core::{
    CreateTodoRequest, SqliteTodoRepository, TodoFilter, TodoPatch, TodoService,
    TodoServiceError, TodoValidationError,
};

fn count(service: &TodoService<SqliteTodoRepository<'_>>) -> usize {
    service.list(TodoFilter::All).unwrap().len()
}

#[test]
fn create_rejects_missing_or_empty_required_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::new(&conn));

    let cases = [
        CreateTodoRequest::default(),
        CreateTodoRequest {
            title: Some("title only".to_string()),
            ..CreateTodoRequest::default()
        },
        CreateTodoRequest::new("", "description"),
        CreateTodoRequest::new("title", ""),
    ];

    for request in cases {
        let err = service.create(request).unwrap_err();
        assert!(matches!(
            err,
            TodoServiceError::Validation(TodoValidationError::MissingRequiredFields)
        ));
    }
    assert_eq!(count(&service), 0);
}

#[test]
fn create_enforces_length_boundaries() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::new(&conn));

    let err = service
        .create(CreateTodoRequest::new("t".repeat(151), "d"))
        .unwrap_err();
    assert!(matches!(
        err,
        TodoServiceError::Validation(TodoValidationError::TitleTooLong)
    ));
    let err = service
        .create(CreateTodoRequest::new("t", "d".repeat(501)))
        .unwrap_err();
    assert!(matches!(
        err,
        TodoServiceError::Validation(TodoValidationError::DescriptionTooLong)
    ));
    assert_eq!(count(&service), 0);

    service
        .create(CreateTodoRequest::new("t".repeat(150), "d"))
        .unwrap();
    service
        .create(CreateTodoRequest::new("t", "d".repeat(500)))
        .unwrap();
    assert_eq!(count(&service), 2);
}

#[test]
fn create_defaults_completed_to_false_and_honours_explicit_value() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::new(&conn));

    let open = service.create(CreateTodoRequest::new("a", "b")).unwrap();
    assert!(!open.completed);

    let done = service
        .create(CreateTodoRequest {
            completed: Some(true),
            ..CreateTodoRequest::new("c", "d")
        })
        .unwrap();
    assert!(done.completed);
    assert_eq!(service.retrieve(done.id).unwrap(), done);
}

#[test]
fn list_filters_by_completion() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::new(&conn));

    service.create(CreateTodoRequest::new("open", "x")).unwrap();
    service
        .create(CreateTodoRequest {
            completed: Some(true),
            ..CreateTodoRequest::new("done", "y")
        })
        .unwrap();

    let done = service.list(TodoFilter::Completed).unwrap();
    assert_eq!(done.len(), 1);
    assert!(done.iter().all(|todo| todo.completed));

    let open = service.list(TodoFilter::Incomplete).unwrap();
    assert_eq!(open.len(), 1);
    assert!(open.iter().all(|todo| !todo.completed));

    assert_eq!(service.list(TodoFilter::from_param(Some("bogus"))).unwrap().len(), 2);
    assert_eq!(service.list(TodoFilter::from_param(None)).unwrap().len(), 2);
}

#[test]
fn update_with_only_completed_keeps_text_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::new(&conn));
    let todo = service.create(CreateTodoRequest::new("A", "B")).unwrap();

    let patch = TodoPatch {
        completed: Some(true),
        ..TodoPatch::default()
    };
    let updated = service.update(todo.id, &patch).unwrap();

    assert_eq!(updated.id, todo.id);
    assert_eq!(updated.title, "A");
    assert_eq!(updated.description, "B");
    assert!(updated.completed);
}

#[test]
fn update_with_empty_patch_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::new(&conn));
    let todo = service.create(CreateTodoRequest::new("A", "B")).unwrap();

    let updated = service.update(todo.id, &TodoPatch::default()).unwrap();
    assert_eq!(updated, todo);
}

#[test]
fn update_rejects_oversized_fields_and_leaves_record_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::new(&conn));
    let todo = service.create(CreateTodoRequest::new("A", "B")).unwrap();

    let patch = TodoPatch {
        title: Some("t".repeat(151)),
        completed: Some(true),
        ..TodoPatch::default()
    };
    let err = service.update(todo.id, &patch).unwrap_err();
    assert!(matches!(
        err,
        TodoServiceError::Validation(TodoValidationError::TitleTooLong)
    ));

    let patch = TodoPatch {
        description: Some("d".repeat(501)),
        ..TodoPatch::default()
    };
    let err = service.update(todo.id, &patch).unwrap_err();
    assert!(matches!(
        err,
        TodoServiceError::Validation(TodoValidationError::DescriptionTooLong)
    ));

    assert_eq!(service.retrieve(todo.id).unwrap(), todo);
}

#[test]
fn missing_ids_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::new(&conn));
    service.create(CreateTodoRequest::new("A", "B")).unwrap();

    let patch = TodoPatch {
        title: Some("new".to_string()),
        ..TodoPatch::default()
    };
    assert!(matches!(
        service.update(404, &patch).unwrap_err(),
        TodoServiceError::NotFound(404)
    ));
    assert!(matches!(
        service.retrieve(404).unwrap_err(),
        TodoServiceError::NotFound(404)
    ));
    assert!(matches!(
        service.delete(404).unwrap_err(),
        TodoServiceError::NotFound(404)
    ));
    assert_eq!(count(&service), 1);
}

#[test]
fn lifecycle_create_retrieve_update_delete() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::new(&conn));

    let created = service.create(CreateTodoRequest::new("A", "B")).unwrap();
    assert_eq!(service.retrieve(created.id).unwrap(), created);

    let patch = TodoPatch {
        completed: Some(true),
        ..TodoPatch::default()
    };
    let updated = service.update(created.id, &patch).unwrap();
    assert!(updated.completed);

    service.delete(created.id).unwrap();
    assert!(matches!(
        service.retrieve(created.id).unwrap_err(),
        TodoServiceError::NotFound(_)
    ));
    assert!(service
        .list(TodoFilter::All)
        .unwrap()
        .iter()
        .all(|todo| todo.id != created.id));
}
