//! Protocol atoms used by the X11 backends.
//!
//! All atoms are interned in a single round trip when a connection is opened
//! and never looked up again.

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        UTF8_STRING,
        _NET_ACTIVE_WINDOW,
        _NET_CLIENT_LIST,
        _NET_CLIENT_LIST_STACKING,
        _NET_CURRENT_DESKTOP,
        _NET_FRAME_EXTENTS,
        _NET_WM_DESKTOP,
        _NET_WM_NAME,
        _NET_WM_STATE,
        _NET_WM_STATE_MAXIMIZED_HORZ,
        _NET_WM_STATE_MAXIMIZED_VERT,
        _NET_WORKAREA,
        _GTK_FRAME_EXTENTS,
        _WINDOWCHARMER_WAKE,
    }
}
