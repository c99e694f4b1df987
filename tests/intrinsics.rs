#[path = "../src/tests/util.rs"]
mod util;

use util::{run_c_source, run_c_source_with_input};

const PROMPT: &str = "Please Input an Integer Value : ";

#[test]
fn get_prompts_and_reads_an_integer() {
    let src = r#"
extern int GET();
extern void PRINT(int);

int main() {
    PRINT(GET() + 1);
    return 0;
}
"#;

    let output = run_c_source_with_input(src, "41\n");
    assert_eq!(output, format!("{PROMPT}42"));
}

#[test]
fn gets_consume_the_stream_left_to_right() {
    let src = r#"
extern int GET();
extern void PRINT(int);

int main() {
    PRINT(GET() * GET());
    return 0;
}
"#;

    let output = run_c_source_with_input(src, "3 4\n");
    assert_eq!(output, format!("{PROMPT}{PROMPT}12"));
}

#[test]
fn get_drives_a_sentinel_loop() {
    let src = r#"
extern int GET();
extern void PRINT(int);

int main() {
    int s;
    int x;
    s = 0;
    x = GET();
    while (x) {
        s = s + x;
        x = GET();
    }
    PRINT(s);
    return 0;
}
"#;

    let output = run_c_source_with_input(src, "1 2 3 0\n");
    assert_eq!(output.matches(PROMPT).count(), 4);
    assert!(output.ends_with('6'), "expected sum 6, got {output}");
}

#[test]
fn get_accepts_negative_numbers() {
    let src = r#"
extern int GET();
extern void PRINT(int);

int main() {
    PRINT(GET());
    return 0;
}
"#;

    let output = run_c_source_with_input(src, "-7\n");
    assert_eq!(output, format!("{PROMPT}-7"));
}

#[test]
fn get_yields_zero_at_end_of_input() {
    let src = r#"
extern int GET();
extern void PRINT(int);

int main() {
    PRINT(GET());
    return 0;
}
"#;

    let output = run_c_source_with_input(src, "");
    assert_eq!(output, format!("{PROMPT}0"));
}

#[test]
fn print_emits_once_per_reached_call() {
    let src = r#"
extern void PRINT(int);

int main() {
    int i;
    for (i = 0; i < 3; i = i + 1) {
        if (i == 1)
            PRINT(i);
    }
    PRINT(9);
    return 0;
}
"#;

    assert_eq!(run_c_source(src), "19");
}

#[test]
fn print_output_follows_evaluation_order() {
    let src = r#"
extern void PRINT(int);

int trace(int n) {
    PRINT(n);
    return n;
}

int main() {
    int s;
    s = trace(1) + trace(2);
    PRINT(s);
    return 0;
}
"#;

    assert_eq!(run_c_source(src), "123");
}
