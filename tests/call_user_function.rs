#[path = "../src/tests/util.rs"]
mod util;

use util::run_c_source;

#[test]
fn recursive_fibonacci_returns_through_the_call_stack() {
    let src = r#"
extern void PRINT(int);

int f(int n) {
    if (n < 2)
        return n;
    return f(n - 1) + f(n - 2);
}

int main() {
    PRINT(f(10));
    return 0;
}
"#;

    assert_eq!(run_c_source(src), "55");
}

#[test]
fn nested_user_function_calls_return_values() {
    let src = r#"
extern void PRINT(int);

int add(int a, int b) {
    return a + b;
}

int compute_triple(int base) {
    int doubled;
    doubled = add(base, base);
    return add(doubled, base);
}

int main() {
    PRINT(compute_triple(5));
    return 0;
}
"#;

    assert_eq!(run_c_source(src), "15");
}

#[test]
fn void_functions_mutate_globals() {
    let src = r#"
extern void PRINT(int);

int counter;

void bump(int by) {
    counter = counter + by;
    return;
}

int main() {
    bump(1);
    bump(2);
    bump(4);
    PRINT(counter);
    return 0;
}
"#;

    assert_eq!(run_c_source(src), "7");
}

#[test]
fn parameters_are_passed_by_value() {
    let src = r#"
extern void PRINT(int);

void tweak(int n) {
    n = n + 100;
}

int main() {
    int n;
    n = 5;
    tweak(n);
    PRINT(n);
    return 0;
}
"#;

    assert_eq!(run_c_source(src), "5");
}

#[test]
fn early_return_unwinds_nested_control_flow() {
    let src = r#"
extern void PRINT(int);

int g(int n) {
    int i;
    i = 0;
    while (i < 10) {
        if (i == 3)
            return 99;
        i = i + 1;
    }
    return -1;
}

int main() {
    PRINT(g(0));
    return 0;
}
"#;

    assert_eq!(run_c_source(src), "99");
}

#[test]
fn return_escapes_loops_without_running_trailing_statements() {
    let src = r#"
extern void PRINT(int);

int probe(int limit) {
    int i;
    int j;
    i = 0;
    while (i < limit) {
        for (j = 0; j < limit; j = j + 1) {
            if (i + j == 4) {
                return i * 10 + j;
            }
        }
        i = i + 1;
        PRINT(i);
    }
    return -1;
}

int main() {
    PRINT(probe(3));
    return 0;
}
"#;

    // i reaches 2 with two trace prints before the early return fires.
    assert_eq!(run_c_source(src), "1222");
}

#[test]
fn deep_recursion_accumulates() {
    let src = r#"
extern void PRINT(int);

int sum_to(int n) {
    if (n < 1)
        return 0;
    return n + sum_to(n - 1);
}

int main() {
    PRINT(sum_to(100));
    return 0;
}
"#;

    assert_eq!(run_c_source(src), "5050");
}

#[test]
fn mutually_recursive_functions_resolve_forward() {
    let src = r#"
extern void PRINT(int);

int is_even(int n) {
    if (n == 0)
        return 1;
    return is_odd(n - 1);
}

int is_odd(int n) {
    if (n == 0)
        return 0;
    return is_even(n - 1);
}

int main() {
    PRINT(is_even(10));
    PRINT(is_odd(7));
    return 0;
}
"#;

    assert_eq!(run_c_source(src), "11");
}
