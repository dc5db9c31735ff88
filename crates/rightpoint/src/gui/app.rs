use crate::events::AppEvent;
use crate::gui::paint;
use crate::sys::session::Session;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use ringkit::{Point, Viewport};
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub session: Rc<RefCell<Session>>,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    PointerMove(Point),
    Resize(Viewport),
    ResumeLevel,
    ConfigReload,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::PointerMove(p) => AppMsg::PointerMove(p),
            AppEvent::Resize(v) => AppMsg::Resize(v),
            AppEvent::ResumeLevel => AppMsg::ResumeLevel,
            AppEvent::ConfigReload => AppMsg::ConfigReload,
            AppEvent::Quit => AppMsg::Quit,
        }
    }
}

impl From<AppMsg> for AppEvent {
    fn from(msg: AppMsg) -> Self {
        match msg {
            AppMsg::PointerMove(p) => AppEvent::PointerMove(p),
            AppMsg::Resize(v) => AppEvent::Resize(v),
            AppMsg::ResumeLevel => AppEvent::ResumeLevel,
            AppMsg::ConfigReload => AppEvent::ConfigReload,
            AppMsg::Quit => AppEvent::Quit,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Session, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Find the Right Point"),
            set_default_size: (800, 600),

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gdk4::Key::Escape {
                        sender.input(AppMsg::Quit);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(Viewport::new(width as f64, height as f64)));
                },

                add_controller = gtk::EventControllerMotion {
                    connect_motion[sender] => move |_, x, y| {
                        sender.input(AppMsg::PointerMove(Point::new(x, y)));
                    }
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (session, rx) = init;

        let model = AppModel {
            session: Rc::new(RefCell::new(session)),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let session_draw = model.session.clone();
        widgets
            .drawing_area
            .set_draw_func(move |_, cr, _, _| {
                let mut session = session_draw.borrow_mut();
                session.flush();
                if let Err(e) = paint::paint(cr, session.scene()) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        let flow = self.session.borrow_mut().handle_event(msg.into());
        if flow.is_break() {
            relm4::main_application().quit();
            return;
        }
        if self.session.borrow().has_pending_frame() {
            self.drawing_area.queue_draw();
        }
    }
}
