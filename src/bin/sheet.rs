use std::io::{BufRead, Write, stdin, stdout};

use miette::{IntoDiagnostic, Result, miette};

use sheet_store::{ColumnType, FileStorage, Row, Store, StoreConfig, Value, View, logging};

const HELP: &str = "\
commands:
  name <name>                 rename the database
  table <name>                create a table
  schema <table>              select a table, schema view
  data <table>                select a table, data view
  column add|drop <column>    edit the selected table's columns
  type <column> <type>        string | number | boolean | null
  possible <column> <a,b,..>  set allowed values
  defaults <column> <a,b,..>  set default values
  row add <json object>       append a row
  row drop <index>            remove a row
  set <index> <column> <json> set one cell
  get <index> <column>        read one cell
  export <table> [dir]        write <table>.json
  import <file>               replace the database from a file
  show                        print the selected table
  exit";

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(false)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    miette::set_panic_hook();
    logging::init();

    let mut config = StoreConfig::from_env();
    if let Some(dir) = std::env::args().nth(1) {
        config = config.with_data_dir(dir);
    }

    let storage = FileStorage::new(&config.data_dir)?;
    let mut store = Store::open(storage, config)?;

    println!(
        "Opened {} ({} tables)",
        store.storage().data_directory().display(),
        store.database().tables.len()
    );

    let mut buf = String::new();

    let mut stdin = stdin().lock();
    let mut stdout = stdout().lock();

    loop {
        let prompt = match store.selection().table() {
            Some(table) => format!("{table}/{}> ", store.selection().view),
            None => "sheet> ".to_string(),
        };
        stdout.write_all(prompt.as_bytes()).into_diagnostic()?;
        stdout.flush().into_diagnostic()?;

        buf.clear();
        let Ok(read) = stdin.read_line(&mut buf) else {
            return Err(miette!("Input reading failed"));
        };
        if read == 0 {
            break;
        }

        let input = buf.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" {
            break;
        }

        match run(&mut store, input) {
            Ok(Some(output)) => println!("{output}"),
            Ok(None) => {}
            Err(err) => println!("{err:?}"),
        }
    }

    println!("Exiting sheet");

    Ok(())
}

fn run<S: sheet_store::StoragePort>(store: &mut Store<S>, input: &str) -> Result<Option<String>> {
    let (command, rest) = input.split_once(' ').unwrap_or((input, ""));
    let rest = rest.trim();

    match command {
        "help" => return Ok(Some(HELP.to_string())),
        "name" => store.set_database_name(rest)?,
        "table" => store.add_table(required(rest, "table name")?)?,
        "schema" => store.view_schema(required(rest, "table name")?)?,
        "data" => store.view_data(required(rest, "table name")?)?,
        "column" => match split(rest) {
            ("add", column) => store.add_column(required(column, "column name")?)?,
            ("drop", column) => store.delete_column(required(column, "column name")?)?,
            _ => return Err(miette!("usage: column add|drop <column>")),
        },
        "type" => {
            let (column, ty) = split(rest);
            let ty: ColumnType = ty
                .parse()
                .map_err(|_| sheet_store::DatabaseError::InvalidColumnType(ty.to_string()))?;
            store.change_type(required(column, "column name")?, ty)?;
        }
        "possible" => {
            let (column, values) = split(rest);
            store.change_possible_values(required(column, "column name")?, list(values))?;
        }
        "defaults" => {
            let (column, values) = split(rest);
            store.change_default_values(required(column, "column name")?, list(values))?;
        }
        "row" => match split(rest) {
            ("add", json) => {
                let row: Row = serde_json::from_str(json).into_diagnostic()?;
                store.add_row(row)?;
            }
            ("drop", index) => store.delete_row(index.parse().into_diagnostic()?)?,
            _ => return Err(miette!("usage: row add <json> | row drop <index>")),
        },
        "set" => {
            let (index, rest) = split(rest);
            let (column, value) = split(rest);
            store.set_cell(
                index.parse().into_diagnostic()?,
                required(column, "column name")?,
                parse_value(value),
            )?;
        }
        "get" => {
            let (index, column) = split(rest);
            let value = store.current_value(index.parse().into_diagnostic()?, column);
            return Ok(Some(value.to_string()));
        }
        "export" => {
            let (table, dir) = split(rest);
            let dir = if dir.is_empty() { "." } else { dir };
            let path = store.export_to_dir(required(table, "table name")?, dir)?;
            return Ok(Some(format!("Wrote {}", path.display())));
        }
        "import" => {
            let json = std::fs::read_to_string(required(rest, "file")?).into_diagnostic()?;
            store.set_database_from_string(&json)?;
        }
        "show" => return Ok(Some(show(store))),
        other => return Err(miette!("Unknown command: {other} (try `help`)")),
    }

    Ok(None)
}

fn split(input: &str) -> (&str, &str) {
    let (head, tail) = input.split_once(' ').unwrap_or((input, ""));
    (head, tail.trim())
}

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.is_empty() {
        Err(miette!("missing {what}"))
    } else {
        Ok(value)
    }
}

fn list(values: &str) -> Vec<String> {
    values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Bare words are taken as text so `set 0 name Alice` works without quotes.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::Text(raw.to_owned()))
}

fn show<S: sheet_store::StoragePort>(store: &Store<S>) -> String {
    let Some(name) = store.selection().table() else {
        let tables: Vec<_> = store.database().tables.keys().cloned().collect();
        return format!("Tables: {}", tables.join(", "));
    };

    let mut out = String::new();
    let schema = store.schema();

    match store.selection().view {
        View::Schema => {
            out.push_str(&format!("{: <16} | {: <8} | possible | defaults\n", name, "type"));
            for (column, data) in &schema.columns {
                out.push_str(&format!(
                    "{: <16} | {: <8} | {} | {}\n",
                    column,
                    data.column_type.to_string(),
                    data.possible_values.as_deref().unwrap_or_default().join(","),
                    data.default_values.as_deref().unwrap_or_default().join(","),
                ));
            }
        }
        View::Data => {
            out.push_str(&format!("{: <8}", name));
            for column in schema.columns.keys() {
                out.push_str(&format!(" | {: <8}", column));
            }
            out.push('\n');

            for (idx, row) in store.database().rows(name).iter().enumerate() {
                out.push_str(&format!("{: <8}", idx));
                for column in schema.columns.keys() {
                    let value = row.get_value(column).cloned().unwrap_or_default();
                    out.push_str(&format!(" | {: <8}", value.to_string()));
                }
                out.push('\n');
            }
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session() {
        let mut store = Store::in_memory();
        for line in [
            "table users",
            "schema users",
            "column add email",
            "column add age",
            "type age number",
            "data users",
            r#"row add {"email":"a@x.com","age":30}"#,
            "set 0 email b@x.com",
        ] {
            run(&mut store, line).unwrap();
        }

        assert_eq!(run(&mut store, "get 0 email").unwrap().as_deref(), Some("b@x.com"));
        assert_eq!(run(&mut store, "get 0 age").unwrap().as_deref(), Some("30"));
        assert_eq!(store.current_value(0, "age"), Value::Integer(30));

        let shown = run(&mut store, "show").unwrap().unwrap();
        assert!(shown.contains("b@x.com"));
    }

    #[test]
    fn test_errors_do_not_change_state() {
        let mut store = Store::in_memory();
        run(&mut store, "table users").unwrap();
        let before = store.to_json().unwrap();

        assert!(run(&mut store, "table users").is_err());
        assert!(run(&mut store, "type email date").is_err());
        assert!(run(&mut store, "frobnicate").is_err());
        assert_eq!(store.to_json().unwrap(), before);
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("12"), Value::Integer(12));
        assert_eq!(parse_value("true"), Value::Boolean(true));
        assert_eq!(parse_value("Alice"), Value::Text("Alice".to_string()));
        assert_eq!(parse_value(r#""12""#), Value::Text("12".to_string()));
    }

    #[test]
    fn test_list() {
        assert_eq!(list("a, b,,c"), vec!["a", "b", "c"]);
        assert!(list("").is_empty());
    }
}
