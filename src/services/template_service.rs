//! Starter code templates
//!
//! Every challenge ships buggy Python. For other languages the first function
//! signature and its first `return` expression are lifted into an equivalent
//! skeleton so participants fix the same bug in the language they chose.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Language, Problem};

static SIGNATURE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"def\s+(\w+)\s*\(([^)]*)\)\s*:").expect("valid signature regex"));

static RETURN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"return\s+([^#\n]+)").expect("valid return regex"));

/// Function extracted from the buggy Python source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuggyFunction {
    pub name: String,
    pub params: Vec<String>,
    pub buggy_return: String,
}

impl BuggyFunction {
    /// Parse the first `def` in `source`
    pub fn parse(source: &str) -> Option<Self> {
        let captures = SIGNATURE_REGEX.captures(source)?;
        let params = captures[2]
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        let buggy_return = RETURN_REGEX
            .captures(source)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default();

        Some(Self {
            name: captures[1].to_string(),
            params,
            buggy_return,
        })
    }

    fn typed_params(&self) -> String {
        self.params
            .iter()
            .map(|p| format!("int {p}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Template generation for the editor
pub struct TemplateService;

impl TemplateService {
    /// Starting buffer for `problem` in `language`
    ///
    /// A problem whose buggy code is an external link starts with an empty buffer.
    pub fn starter_code(problem: &Problem, language: Language) -> String {
        match problem.inline_code() {
            Some(code) => Self::generate(code, language),
            None => String::new(),
        }
    }

    /// Translate buggy Python `source` into a skeleton for `language`
    pub fn generate(source: &str, language: Language) -> String {
        match BuggyFunction::parse(source) {
            Some(function) => Self::lifted(source, &function, language),
            None => Self::generic(source, language),
        }
    }

    fn lifted(source: &str, f: &BuggyFunction, language: Language) -> String {
        let name = &f.name;
        let ret = &f.buggy_return;
        let typed = f.typed_params();
        match language {
            Language::Python => source.to_string(),
            Language::Javascript => format!(
                "function {name}({params}) {{\n    // This function has a bug\n    return {ret}; // Bug: fix this\n}}\n\n\
                 const readline = require('readline');\n\
                 const rl = readline.createInterface({{ input: process.stdin, output: process.stdout }});\n\n\
                 let inputLines = [];\n\
                 rl.on('line', (line) => inputLines.push(line));\n\
                 rl.on('close', () => {{\n    const [a, b] = inputLines[0].split(' ').map(Number);\n    console.log({name}(a, b));\n}});\n",
                params = f.params.join(", "),
            ),
            Language::Java => format!(
                "public class Main {{\n    public static int {name}({typed}) {{\n        // This function has a bug\n        return {ret}; // Bug: fix this\n    }}\n\n\
                 \x20   public static void main(String[] args) {{\n        java.util.Scanner scanner = new java.util.Scanner(System.in);\n        int a = scanner.nextInt();\n        int b = scanner.nextInt();\n        System.out.println({name}(a, b));\n    }}\n}}\n"
            ),
            Language::Cpp => format!(
                "#include <iostream>\nusing namespace std;\n\nint {name}({typed}) {{\n    // This function has a bug\n    return {ret}; // Bug: fix this\n}}\n\n\
                 int main() {{\n    int a, b;\n    cin >> a >> b;\n    cout << {name}(a, b) << endl;\n    return 0;\n}}\n"
            ),
            Language::C => format!(
                "#include <stdio.h>\n\nint {name}({typed}) {{\n    // This function has a bug\n    return {ret}; // Bug: fix this\n}}\n\n\
                 int main() {{\n    int a, b;\n    scanf(\"%d %d\", &a, &b);\n    printf(\"%d\\n\", {name}(a, b));\n    return 0;\n}}\n"
            ),
            Language::Csharp => format!(
                "using System;\n\nclass Program {{\n    static int {name}({typed}) {{\n        // This function has a bug\n        return {ret}; // Bug: fix this\n    }}\n\n\
                 \x20   static void Main() {{\n        string[] input = Console.ReadLine().Split();\n        int a = int.Parse(input[0]);\n        int b = int.Parse(input[1]);\n        Console.WriteLine({name}(a, b));\n    }}\n}}\n"
            ),
        }
    }

    fn generic(source: &str, language: Language) -> String {
        let skeleton = match language {
            Language::Python => return source.to_string(),
            Language::Javascript => {
                "// Write your fix here\n\nconst lines = require('fs').readFileSync(0, 'utf8').split('\\n');\n"
            }
            Language::Java => {
                "// Write your fix here\n\npublic class Main {\n    public static void main(String[] args) {\n        java.util.Scanner scanner = new java.util.Scanner(System.in);\n    }\n}\n"
            }
            Language::Cpp => {
                "// Write your fix here\n\n#include <iostream>\nusing namespace std;\n\nint main() {\n    return 0;\n}\n"
            }
            Language::C => "// Write your fix here\n\n#include <stdio.h>\n\nint main() {\n    return 0;\n}\n",
            Language::Csharp => {
                "// Write your fix here\n\nusing System;\n\nclass Program {\n    static void Main() {\n    }\n}\n"
            }
        };
        skeleton.to_string()
    }
}
