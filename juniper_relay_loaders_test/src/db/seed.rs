use super::{Record, Store, Value};

const EDITOR_COUNT: i64 = 100;

/// Fills `store` with the demo data: 100 editors plus a small company.
pub(crate) fn populate(store: &Store) {
    for table in [
        "editors",
        "departments",
        "roles",
        "employees",
        "projects",
        "employee_projects",
    ] {
        store.create_table(table);
    }

    for num in 0..EDITOR_COUNT {
        store.insert(
            "editors",
            Record::new()
                .with("id", num + 1)
                .with("name", format!("Editor#{num}")),
        );
    }

    // Sales has nobody in it.
    for (id, name) in [(1, "Engineering"), (2, "Human Resources"), (3, "Sales")] {
        store.insert("departments", Record::new().with("id", id).with("name", name));
    }

    for (id, name) in [(1, "Manager"), (2, "Engineer")] {
        store.insert("roles", Record::new().with("id", id).with("name", name));
    }

    for (id, name, department, role) in [
        (1, "Peter", Some(1), Some(2)),
        (2, "Roy", Some(1), Some(2)),
        (3, "Tracy", Some(2), Some(1)),
        (4, "Ann", Some(1), Some(1)),
        (5, "Drew", None, None),
    ] {
        store.insert(
            "employees",
            Record::new()
                .with("id", id)
                .with("name", name)
                .with("department_id", Value::from(department))
                .with("role_id", Value::from(role)),
        );
    }

    for (id, name) in [(1, "Apollo"), (2, "Gemini"), (3, "Mercury")] {
        store.insert("projects", Record::new().with("id", id).with("name", name));
    }

    for (employee, project) in [(1, 1), (1, 2), (2, 2), (3, 3), (4, 1)] {
        store.insert(
            "employee_projects",
            Record::new()
                .with("employee_id", employee)
                .with("project_id", project),
        );
    }
}
