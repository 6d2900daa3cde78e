// ==========================================
// Lecturna 教务系统 - 班级命名纯函数库
// ==========================================
// 职责: 课程代码规范化与顺序班级命名
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

// ==========================================
// ClassCodeGenerator - 纯函数工具类
// ==========================================
pub struct ClassCodeGenerator;

impl ClassCodeGenerator {
    /// 规范化课程代码
    ///
    /// # 规则
    /// - 转大写
    /// - 剔除非字母数字字符
    /// - 截断到 3 个字符
    ///
    /// # 示例
    /// ```
    /// use lecturna::engine::ClassCodeGenerator;
    /// assert_eq!(ClassCodeGenerator::normalize_course_code("col-101"), "COL");
    /// ```
    pub fn normalize_course_code(raw: &str) -> String {
        raw.chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(3)
            .collect::<String>()
            .to_uppercase()
    }

    /// 生成下一个班级名称
    ///
    /// # 规则
    /// - 序号 = existing_count + 1 (1 起)
    /// - 序号补零到 3 位;超过 999 时自然加宽,不截断
    ///
    /// # 示例
    /// ```
    /// use lecturna::engine::ClassCodeGenerator;
    /// assert_eq!(ClassCodeGenerator::next_class_name("COL", 0), "COL001");
    /// assert_eq!(ClassCodeGenerator::next_class_name("COL", 11), "COL012");
    /// ```
    pub fn next_class_name(course_code: &str, existing_count: u32) -> String {
        format!("{}{:03}", course_code, existing_count + 1)
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_and_truncates() {
        assert_eq!(ClassCodeGenerator::normalize_course_code("col-101"), "COL");
        assert_eq!(ClassCodeGenerator::normalize_course_code("  py "), "PY");
        assert_eq!(ClassCodeGenerator::normalize_course_code("C#-Basic"), "CBA");
        assert_eq!(ClassCodeGenerator::normalize_course_code(""), "");
    }

    #[test]
    fn test_next_class_name_padding() {
        assert_eq!(ClassCodeGenerator::next_class_name("COL", 0), "COL001");
        assert_eq!(ClassCodeGenerator::next_class_name("COL", 11), "COL012");
        assert_eq!(ClassCodeGenerator::next_class_name("COL", 99), "COL100");
    }

    #[test]
    fn test_next_class_name_widens_past_999() {
        assert_eq!(ClassCodeGenerator::next_class_name("COL", 999), "COL1000");
    }
}
