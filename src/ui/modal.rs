//! The five dialogs: login, signup, subscription, about, profile.
//!
//! Each dialog is an independent show/hide flag. Nothing enforces a single
//! open dialog; at most one at a time is a convention of the triggers. The
//! close affordances are Esc and a mouse click landing on the backdrop
//! (inside the frame, outside the dialog content).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Login,
    Signup,
    Subscription,
    About,
    Profile,
}

/// Fixed priority used when several dialogs are open at once: the first open
/// one in this order receives input and is the one Esc closes.
pub const MODAL_ORDER: [ModalKind; 5] = [
    ModalKind::Login,
    ModalKind::Signup,
    ModalKind::Subscription,
    ModalKind::About,
    ModalKind::Profile,
];

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub masked: bool,
}

impl FormField {
    fn new(label: &'static str, masked: bool) -> Self {
        Self {
            label,
            value: String::new(),
            masked,
        }
    }
}

/// Editable field list with a focus cursor, used by the login and signup
/// dialogs.
#[derive(Debug, Clone)]
pub struct AuthForm {
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl AuthForm {
    pub fn login() -> Self {
        Self {
            fields: vec![FormField::new("Email", false), FormField::new("Password", true)],
            focus: 0,
        }
    }

    pub fn signup() -> Self {
        Self {
            fields: vec![
                FormField::new("Username", false),
                FormField::new("Email", false),
                FormField::new("Password", true),
            ],
            focus: 0,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_prev(&mut self) {
        if self.focus == 0 {
            self.focus = self.fields.len() - 1;
        } else {
            self.focus -= 1;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.focus = 0;
    }

    fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }
}

#[derive(Debug)]
pub struct ModalController {
    pub login_open: bool,
    pub signup_open: bool,
    pub subscription_open: bool,
    pub about_open: bool,
    pub profile_open: bool,
    pub login_form: AuthForm,
    pub signup_form: AuthForm,
}

impl Default for ModalController {
    fn default() -> Self {
        Self {
            login_open: false,
            signup_open: false,
            subscription_open: false,
            about_open: false,
            profile_open: false,
            login_form: AuthForm::login(),
            signup_form: AuthForm::signup(),
        }
    }
}

impl ModalController {
    fn flag_mut(&mut self, kind: ModalKind) -> &mut bool {
        match kind {
            ModalKind::Login => &mut self.login_open,
            ModalKind::Signup => &mut self.signup_open,
            ModalKind::Subscription => &mut self.subscription_open,
            ModalKind::About => &mut self.about_open,
            ModalKind::Profile => &mut self.profile_open,
        }
    }

    pub fn is_open(&self, kind: ModalKind) -> bool {
        match kind {
            ModalKind::Login => self.login_open,
            ModalKind::Signup => self.signup_open,
            ModalKind::Subscription => self.subscription_open,
            ModalKind::About => self.about_open,
            ModalKind::Profile => self.profile_open,
        }
    }

    pub fn show(&mut self, kind: ModalKind) {
        *self.flag_mut(kind) = true;
    }

    pub fn hide(&mut self, kind: ModalKind) {
        *self.flag_mut(kind) = false;
    }

    pub fn any_open(&self) -> bool {
        self.topmost().is_some()
    }

    pub fn topmost(&self) -> Option<ModalKind> {
        MODAL_ORDER.iter().copied().find(|k| self.is_open(*k))
    }

    /// The editable form of the receiving dialog, if it has one.
    pub fn active_form_mut(&mut self) -> Option<&mut AuthForm> {
        match self.topmost() {
            Some(ModalKind::Login) => Some(&mut self.login_form),
            Some(ModalKind::Signup) => Some(&mut self.signup_form),
            _ => None,
        }
    }

    pub fn login_values(&self) -> (String, String) {
        (
            self.login_form.value(0).trim().to_string(),
            self.login_form.value(1).to_string(),
        )
    }

    pub fn signup_values(&self) -> (String, String, String) {
        (
            self.signup_form.value(0).trim().to_string(),
            self.signup_form.value(1).trim().to_string(),
            self.signup_form.value(2).to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialogs_toggle_independently() {
        let mut modals = ModalController::default();
        modals.show(ModalKind::About);
        modals.show(ModalKind::Profile);
        assert!(modals.is_open(ModalKind::About));
        assert!(modals.is_open(ModalKind::Profile));
        modals.hide(ModalKind::About);
        assert!(!modals.is_open(ModalKind::About));
        assert!(modals.is_open(ModalKind::Profile));
    }

    #[test]
    fn topmost_follows_fixed_priority() {
        let mut modals = ModalController::default();
        assert_eq!(modals.topmost(), None);
        modals.show(ModalKind::About);
        modals.show(ModalKind::Signup);
        assert_eq!(modals.topmost(), Some(ModalKind::Signup));
    }

    #[test]
    fn form_focus_wraps_both_ways() {
        let mut form = AuthForm::signup();
        form.focus_prev();
        assert_eq!(form.focus, 2);
        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn typed_values_land_in_the_focused_field() {
        let mut modals = ModalController::default();
        modals.show(ModalKind::Login);
        let form = modals.active_form_mut().expect("login has a form");
        for c in "ada@example.org".chars() {
            form.insert_char(c);
        }
        form.focus_next();
        for c in "hunter2".chars() {
            form.insert_char(c);
        }
        let (email, password) = modals.login_values();
        assert_eq!(email, "ada@example.org");
        assert_eq!(password, "hunter2");
    }

    #[test]
    fn reset_clears_values_and_focus() {
        let mut form = AuthForm::login();
        form.insert_char('x');
        form.focus_next();
        form.reset();
        assert_eq!(form.focus, 0);
        assert!(form.fields.iter().all(|f| f.value.is_empty()));
    }
}
