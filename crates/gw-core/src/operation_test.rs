use super::*;

fn parse_ops(yaml: &str) -> Vec<SchemaOperation> {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn test_parse_create_table() {
    let yaml = r#"
- create_table:
    name: products
    columns:
      - name: id
        type: bigint
        primary_key: true
      - name: category
        type: string
      - name: goal_attainment_level
        type: integer
        nullable: false
        default: 0
    timestamps: true
"#;
    let ops = parse_ops(yaml);
    assert_eq!(ops.len(), 1);
    match &ops[0] {
        SchemaOperation::CreateTable {
            name,
            columns,
            timestamps,
        } => {
            assert_eq!(name, "products");
            assert_eq!(columns.len(), 3);
            assert!(columns[0].primary_key);
            assert!(columns[1].nullable);
            assert!(!columns[2].nullable);
            assert_eq!(columns[2].default, Some(DefaultValue::Int(0)));
            assert!(timestamps);
        }
        other => panic!("unexpected op: {other:?}"),
    }
}

#[test]
fn test_parse_rejects_unknown_operation() {
    let yaml = r#"
- creat_table:
    name: products
"#;
    let result: Result<Vec<SchemaOperation>, _> = serde_yaml::from_str(yaml);
    assert!(result.is_err());
}

#[test]
fn test_parse_rejects_unknown_field() {
    let yaml = r#"
- drop_table:
    name: products
    cascade: true
"#;
    let result: Result<Vec<SchemaOperation>, _> = serde_yaml::from_str(yaml);
    assert!(result.is_err());
}

#[test]
fn test_create_table_sql() {
    let yaml = r#"
- create_table:
    name: products
    columns:
      - name: id
        type: bigint
        primary_key: true
      - name: status
        type: string
        nullable: false
        default: draft
    timestamps: true
"#;
    let ops = parse_ops(yaml);
    assert_eq!(
        ops[0].to_sql(),
        r#"CREATE TABLE "products" ("id" BIGINT PRIMARY KEY, "status" VARCHAR NOT NULL DEFAULT 'draft', "created_at" TIMESTAMP NOT NULL, "updated_at" TIMESTAMP NOT NULL)"#
    );
}

#[test]
fn test_alter_table_sql() {
    let ops = parse_ops(
        r#"
- add_column:
    table: products
    column:
      name: phase
      type: string
- drop_column:
    table: products
    name: phase
- rename_column:
    table: products
    from: partnumber
    to: part_number
- rename_table:
    from: products
    to: items
"#,
    );
    assert_eq!(
        ops[0].to_sql(),
        r#"ALTER TABLE "products" ADD COLUMN "phase" VARCHAR"#
    );
    assert_eq!(
        ops[1].to_sql(),
        r#"ALTER TABLE "products" DROP COLUMN "phase""#
    );
    assert_eq!(
        ops[2].to_sql(),
        r#"ALTER TABLE "products" RENAME COLUMN "partnumber" TO "part_number""#
    );
    assert_eq!(ops[3].to_sql(), r#"ALTER TABLE "products" RENAME TO "items""#);
}

#[test]
fn test_index_sql() {
    let ops = parse_ops(
        r#"
- create_index:
    table: products
    columns: [category, status]
- create_index:
    table: products
    columns: [partnumber]
    name: uq_products_partnumber
    unique: true
- drop_index:
    name: idx_products_category_status
"#,
    );
    assert_eq!(
        ops[0].to_sql(),
        r#"CREATE INDEX "idx_products_category_status" ON "products" ("category", "status")"#
    );
    assert_eq!(
        ops[1].to_sql(),
        r#"CREATE UNIQUE INDEX "uq_products_partnumber" ON "products" ("partnumber")"#
    );
    assert_eq!(ops[2].to_sql(), r#"DROP INDEX "idx_products_category_status""#);
}

#[test]
fn test_raw_sql_passthrough() {
    let ops = parse_ops(
        r#"
- sql: "CREATE VIEW active_products AS SELECT * FROM products WHERE status = 'active'"
"#,
    );
    assert_eq!(
        ops[0].to_sql(),
        "CREATE VIEW active_products AS SELECT * FROM products WHERE status = 'active'"
    );
}

#[test]
fn test_qualified_table_names_are_quoted() {
    let op = SchemaOperation::DropTable {
        name: "staging.products".to_string(),
    };
    assert_eq!(op.to_sql(), r#"DROP TABLE "staging"."products""#);
}

#[test]
fn test_invert_create_table() {
    let op = SchemaOperation::CreateTable {
        name: "products".to_string(),
        columns: vec![],
        timestamps: true,
    };
    assert_eq!(
        op.invert(),
        Some(SchemaOperation::DropTable {
            name: "products".to_string()
        })
    );
}

#[test]
fn test_invert_add_column() {
    let ops = parse_ops(
        r#"
- add_column:
    table: products
    column:
      name: phase
      type: string
"#,
    );
    assert_eq!(
        ops[0].invert(),
        Some(SchemaOperation::DropColumn {
            table: "products".to_string(),
            name: "phase".to_string()
        })
    );
}

#[test]
fn test_invert_renames_swap() {
    let op = SchemaOperation::RenameColumn {
        table: "products".to_string(),
        from: "a".to_string(),
        to: "b".to_string(),
    };
    let inverse = op.invert().unwrap();
    assert_eq!(inverse.invert().unwrap(), op);

    let op = SchemaOperation::RenameTable {
        from: "products".to_string(),
        to: "items".to_string(),
    };
    let inverse = op.invert().unwrap();
    assert_eq!(inverse.invert().unwrap(), op);
}

#[test]
fn test_invert_create_index_uses_effective_name() {
    let op = SchemaOperation::CreateIndex {
        table: "products".to_string(),
        columns: vec!["category".to_string()],
        name: None,
        unique: false,
    };
    assert_eq!(
        op.invert(),
        Some(SchemaOperation::DropIndex {
            name: "idx_products_category".to_string()
        })
    );
}

#[test]
fn test_destructive_operations_have_no_inverse() {
    let ops = [
        SchemaOperation::DropTable {
            name: "t".to_string(),
        },
        SchemaOperation::DropColumn {
            table: "t".to_string(),
            name: "c".to_string(),
        },
        SchemaOperation::DropIndex {
            name: "i".to_string(),
        },
        SchemaOperation::Sql("DELETE FROM t".to_string()),
    ];
    for op in &ops {
        assert_eq!(op.invert(), None, "expected no inverse for {op:?}");
    }
}

#[test]
fn test_default_value_rendering() {
    assert_eq!(DefaultValue::Bool(true).to_sql(), "TRUE");
    assert_eq!(DefaultValue::Bool(false).to_sql(), "FALSE");
    assert_eq!(DefaultValue::Int(-3).to_sql(), "-3");
    assert_eq!(DefaultValue::Float(1.5).to_sql(), "1.5");
    assert_eq!(
        DefaultValue::Text("O'Brien".to_string()).to_sql(),
        "'O''Brien'"
    );
}

#[test]
fn test_validate_create_table_without_columns() {
    let op = SchemaOperation::CreateTable {
        name: "empty".to_string(),
        columns: vec![],
        timestamps: false,
    };
    assert!(op.validate().unwrap_err().contains("no columns"));

    // timestamps alone is enough to make the table non-empty
    let op = SchemaOperation::CreateTable {
        name: "audit".to_string(),
        columns: vec![],
        timestamps: true,
    };
    assert!(op.validate().is_ok());
}

#[test]
fn test_validate_duplicate_column() {
    let ops = parse_ops(
        r#"
- create_table:
    name: products
    columns:
      - name: status
        type: string
      - name: status
        type: integer
"#,
    );
    assert!(ops[0].validate().unwrap_err().contains("twice"));
}

#[test]
fn test_validate_empty_index_and_sql() {
    let op = SchemaOperation::CreateIndex {
        table: "products".to_string(),
        columns: vec![],
        name: None,
        unique: false,
    };
    assert!(op.validate().is_err());

    let op = SchemaOperation::Sql("   ".to_string());
    assert!(op.validate().is_err());
}
