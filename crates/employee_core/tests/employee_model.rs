use employee_core::{Employee, EmployeeValidationError};

#[test]
fn new_employee_is_unsaved_and_valid() {
    let employee = Employee::new("first_name_test", "last_name_test", "email_test");

    assert_eq!(employee.id, None);
    assert!(!employee.is_saved());
    assert_eq!(employee.first_name, "first_name_test");
    assert_eq!(employee.last_name, "last_name_test");
    assert_eq!(employee.email, "email_test");
    assert_eq!(employee.validate(), Ok(()));
}

#[test]
fn validate_rejects_blank_fields_in_declaration_order() {
    let all_blank = Employee::new("", " ", "\t");
    assert_eq!(
        all_blank.validate(),
        Err(EmployeeValidationError::BlankFirstName)
    );

    let blank_last = Employee::new("a", " ", "c");
    assert_eq!(
        blank_last.validate(),
        Err(EmployeeValidationError::BlankLastName)
    );

    let blank_email = Employee::new("a", "b", "");
    assert_eq!(
        blank_email.validate(),
        Err(EmployeeValidationError::BlankEmail)
    );
}

#[test]
fn validate_rejects_non_positive_id() {
    let mut employee = Employee::new("a", "b", "c");
    employee.id = Some(0);

    let err = employee.validate().unwrap_err();
    assert_eq!(err, EmployeeValidationError::NonPositiveId(0));
    assert_eq!(err.to_string(), "employee id must be positive, got 0");
}

#[test]
fn serialization_uses_camel_case_wire_fields() {
    let mut employee = Employee::new("Ada", "Lovelace", "ada@example.com");
    employee.id = Some(7);

    let json = serde_json::to_value(&employee).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["firstName"], "Ada");
    assert_eq!(json["lastName"], "Lovelace");
    assert_eq!(json["email"], "ada@example.com");

    let decoded: Employee = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, employee);
}

#[test]
fn unsaved_employee_serializes_null_id() {
    let employee = Employee::new("Ada", "Lovelace", "ada@example.com");

    let json = serde_json::to_value(&employee).unwrap();
    assert!(json["id"].is_null());
}
