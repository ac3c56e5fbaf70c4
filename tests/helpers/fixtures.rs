//! Common source fixtures for tests.

pub const CSHARP_CLASS: &str = r#"using System;

namespace Demo
{
    /* block comment
       spanning lines */
    public class Counter
    {
        private int count = 0x1Fu;
        public string Name => @"verbatim ""quoted""";

        public void Add(double step) { count += (int)(step * 2.5e3); }
    }
}"#;

pub const PLAIN_LINES: &str = "alpha\nbeta\ngamma\ndelta\nepsilon";

pub const OPEN_COMMENT_TAIL: &str = "int a;\nint b;\nint c;\nint d;";
